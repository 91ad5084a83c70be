//! Authentication commands.

use super::build_session_manager;
use anyhow::Result;
use crescent_session::validate;
use std::io::{self, Write};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Login with email and password.
pub async fn login() -> Result<()> {
    let manager = build_session_manager()?;

    if manager.is_authenticated() {
        let snapshot = manager.snapshot();
        let email = snapshot
            .user
            .map(|u| u.email)
            .unwrap_or_else(|| "unknown".to_string());
        println!("Already logged in as {}", email);
        return Ok(());
    }

    let email = prompt("Email")?;
    let password = rpassword::prompt_password("Password: ")?;

    println!("Logging in...");

    if manager.login(&email, &password).await {
        let snapshot = manager.snapshot();
        let who = snapshot
            .user
            .map(|u| u.email)
            .unwrap_or_else(|| "user".to_string());
        println!("Logged in as {}", who);
    } else if let Some(error) = manager.last_error() {
        eprintln!("Login failed: {}", error.message);
    }

    Ok(())
}

/// Register a new account.
pub async fn register() -> Result<()> {
    let manager = build_session_manager()?;

    let username = prompt("Username")?;
    let email = prompt("Email")?;
    let password = rpassword::prompt_password("Password: ")?;
    let confirmation = rpassword::prompt_password("Confirm password: ")?;

    // The confirmation field belongs to this layer, not the session manager
    if let Err(error) = validate::confirmation_matches(&password, &confirmation) {
        eprintln!("{}", error);
        return Ok(());
    }

    if manager.register(&username, &email, &password).await {
        println!("Registered. Check {} for a verification code, then run:", email);
        println!("  crescent verify --email {} --otp <code>", email);
    } else if let Some(error) = manager.last_error() {
        eprintln!("Registration failed: {}", error.message);
    }

    Ok(())
}

/// Verify the email code and establish the first session.
pub async fn verify(email: &str, otp: &str) -> Result<()> {
    let manager = build_session_manager()?;

    if manager.verify_email(email, otp).await {
        println!("Email verified, you are now logged in");
    } else if let Some(error) = manager.last_error() {
        eprintln!("Verification failed: {}", error.message);
    }

    Ok(())
}

/// Logout and clear the session.
pub async fn logout() -> Result<()> {
    let manager = build_session_manager()?;

    // Clears locally whatever the server says
    manager.logout().await;
    println!("Logged out");

    Ok(())
}

/// Show session status.
pub async fn status() -> Result<()> {
    let manager = build_session_manager()?;
    let snapshot = manager.snapshot();

    if let Some(user) = &snapshot.user {
        println!("Auth:       logged in");
        println!("User:       {} <{}>", user.username, user.email);
        println!("Verified:   {}", user.is_verified);
    } else {
        println!("Auth:       not logged in");
    }
    println!("Onboarded:  {}", snapshot.has_onboarded);
    match manager.device_id() {
        Some(device_id) => println!("Device ID:  {}", device_id),
        None => println!("Device ID:  unavailable"),
    }

    Ok(())
}

/// Mark onboarding as completed.
pub async fn onboard() -> Result<()> {
    let manager = build_session_manager()?;
    manager.complete_onboarding();
    println!("Onboarding marked complete");

    Ok(())
}
