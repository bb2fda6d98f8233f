use super::rbac::Role;
use crate::config::AccountConfig;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    role: Role,
}

/// Static sign-in table: email -> (password, role).
///
/// Built once from configuration and never modified while the process runs.
/// Emails match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: HashMap<String, Account>,
}

impl AccountDirectory {
    pub fn from_config(accounts: &[AccountConfig]) -> Self {
        let accounts = accounts
            .iter()
            .map(|a| {
                (
                    normalize(&a.email),
                    Account {
                        password: a.password.clone(),
                        role: a.role,
                    },
                )
            })
            .collect();
        Self { accounts }
    }

    /// Role of the account when the password matches
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Role> {
        self.accounts
            .get(&normalize(email))
            .filter(|account| account.password == password)
            .map(|account| account.role)
    }

    pub fn role_of(&self, email: &str) -> Option<Role> {
        self.accounts.get(&normalize(email)).map(|a| a.role)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_accounts;

    #[test]
    fn default_table_matches_front_desk_accounts() {
        let directory = AccountDirectory::from_config(&default_accounts());
        assert_eq!(directory.len(), 4);
        assert_eq!(
            directory.authenticate("manager@restaurant.com", "admin"),
            Some(Role::Manager)
        );
        assert_eq!(
            directory.authenticate("chef@restaurant.com", "chef"),
            Some(Role::Employee)
        );
        assert_eq!(
            directory.authenticate("waiter@restaurant.com", "waiter"),
            Some(Role::Employee)
        );
        assert_eq!(
            directory.authenticate("customer@example.com", "customer"),
            Some(Role::Customer)
        );
    }

    #[test]
    fn wrong_password_or_unknown_email_fails() {
        let directory = AccountDirectory::from_config(&default_accounts());
        assert_eq!(directory.authenticate("manager@restaurant.com", "chef"), None);
        assert_eq!(directory.authenticate("ghost@restaurant.com", "admin"), None);
    }

    #[test]
    fn email_lookup_ignores_case_and_whitespace() {
        let directory = AccountDirectory::from_config(&default_accounts());
        assert_eq!(
            directory.authenticate(" Manager@Restaurant.com ", "admin"),
            Some(Role::Manager)
        );
        assert_eq!(directory.role_of("CHEF@restaurant.com"), Some(Role::Employee));
    }
}
