use crate::client::CivicClient;
use crate::error::{CivicError, Result};
use crate::output;
use crate::types::Profile;

pub async fn show(client: &mut CivicClient) -> Result<()> {
    client.session().ok_or(CivicError::MissingSession)?;

    let profile: Profile = client.get("/api/profile/").await?;

    output::print_item(&profile, |p| {
        println!("Username:        {}", p.username);
        if let Some(role) = &p.role {
            println!("Role:            {role}");
        }
        if let Some(department) = &p.department {
            println!("Department:      {department}");
        }
        if let Some(phone) = &p.phone_number {
            println!("Phone:           {phone}");
        }
        println!("Points:          {}", p.points);
        println!("Issues resolved: {}", p.issues_resolved);
    });

    Ok(())
}
