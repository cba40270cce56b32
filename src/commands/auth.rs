use std::io::{self, Write};

use serde_json::json;

use crate::cli::{LoginArgs, OfficerRegisterArgs, RegisterArgs};
use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::output;
use crate::responses::TokenPair;
use crate::session::{Role, Session};
use crate::types::Profile;

pub async fn login(client: &mut CivicClient, args: LoginArgs) -> Result<()> {
    let username = match args.username {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match args.password {
        Some(p) => p,
        None => prompt("Password: ")?,
    };

    if username.is_empty() || password.is_empty() {
        return Err(CivicError::Validation(
            "Username and password are required.".to_string(),
        ));
    }

    let tokens: TokenPair = client
        .post(
            "/api/auth/login/",
            json!({ "username": username, "password": password }),
        )
        .await?;

    let role = tokens.role;
    client.set_session(Session {
        access: tokens.access,
        refresh: tokens.refresh,
        role,
        username: tokens.username.clone(),
    })?;

    output::print_message(&format!("Logged in as {} ({role})", tokens.username));

    let hint = match role {
        Role::Citizen => "Try `civic report` to file an issue.",
        Role::DeptOfficer => "Try `civic issues --assigned` to see your queue.",
        Role::Admin => "Try `civic issues --high-priority` for an overview.",
        Role::Unknown => "Try `civic issues` to browse reports.",
    };
    output::print_message(hint);

    Ok(())
}

pub fn logout(client: &mut CivicClient) -> Result<()> {
    if client.session().is_none() {
        output::print_message("Not logged in.");
        return Ok(());
    }
    client.clear_session();
    output::print_message("Logged out.");
    Ok(())
}

pub async fn whoami(client: &mut CivicClient) -> Result<()> {
    let session = client.session().ok_or(CivicError::MissingSession)?;
    let username = session.username.clone();
    let role = session.role;

    let profile: Profile = client.get("/api/profile/").await?;

    output::print_item(&profile, |p| {
        println!("{username} ({role})");
        if let Some(department) = &p.department {
            println!("Department: {department}");
        }
        println!("Points:     {}", p.points);
        println!("Resolved:   {}", p.issues_resolved);
    });

    Ok(())
}

pub async fn register_citizen(client: &mut CivicClient, args: RegisterArgs) -> Result<()> {
    client
        .post::<serde_json::Value>(
            "/api/auth/register-citizen/",
            json!({
                "username": args.username,
                "password": args.password,
                "phone_number": args.phone,
            }),
        )
        .await?;

    output::print_message("Citizen registered successfully! Run `civic login` to sign in.");
    Ok(())
}

pub async fn register_officer(client: &mut CivicClient, args: OfficerRegisterArgs) -> Result<()> {
    client
        .post::<serde_json::Value>(
            "/api/auth/register-officer/",
            json!({
                "username": args.username,
                "password": args.password,
                "department": args.department,
                "phone_number": args.phone,
            }),
        )
        .await?;

    output::print_message("Officer registered successfully! Run `civic login` to sign in.");
    Ok(())
}

pub async fn register_admin(client: &mut CivicClient, args: RegisterArgs) -> Result<()> {
    client
        .post::<serde_json::Value>(
            "/api/auth/register-admin/",
            json!({
                "username": args.username,
                "password": args.password,
                "phone_number": args.phone,
            }),
        )
        .await?;

    output::print_message("Admin registered successfully! Run `civic login` to sign in.");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
