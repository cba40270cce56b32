use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Department {
    pub id: u64,
    pub name: String,
}
