use tabled::Tabled;

use crate::client::CivicClient;
use crate::error::Result;
use crate::output;
use crate::types::Department;

#[derive(Tabled)]
struct DepartmentRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id,
            name: department.name.clone(),
        }
    }
}

pub async fn list(client: &mut CivicClient) -> Result<()> {
    let departments: Vec<Department> = client.get("/api/departments/").await?;

    if departments.is_empty() {
        output::print_message("No departments available.");
        return Ok(());
    }

    output::print_table(&departments, |d| DepartmentRow::from(d));
    Ok(())
}
