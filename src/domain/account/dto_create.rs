/// Data required to persist a new account.
///
/// The password is already hashed by the time this reaches a repository.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
