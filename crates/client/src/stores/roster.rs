//! Online users.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    users: Vec<String>,
}

impl Roster {
    pub fn set(&mut self, users: Vec<String>) {
        self.users = users;
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn is_online(&self, name: &str) -> bool {
        self.users.iter().any(|u| u == name)
    }
}
