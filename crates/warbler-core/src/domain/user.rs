use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Message;
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

/// Profile picture used when a user does not supply one.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";

/// Profile header used when a user does not supply one.
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// User entity - a persisted account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub username: String,
    /// Salted password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl User {
    /// Build an unsaved user from signup input, hashing the password.
    ///
    /// The password must be present and non-empty. A missing username or
    /// email is accepted here; the store rejects it when the user is committed.
    pub fn signup(
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        image_url: Option<&str>,
        hasher: &dyn PasswordService,
    ) -> Result<NewUser, DomainError> {
        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(DomainError::Validation("password must not be empty".to_string())),
        };

        let hashed = hasher
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(NewUser {
            id: None,
            username: username.map(str::to_string),
            email: email.map(str::to_string),
            password: hashed,
            image_url: image_url.unwrap_or(DEFAULT_IMAGE_URL).to_string(),
            header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: None,
            location: None,
        })
    }

    /// Find the user by username and check the password.
    ///
    /// Returns `Ok(None)` for an unknown username or a wrong password.
    pub async fn authenticate(
        users: &dyn UserRepository,
        hasher: &dyn PasswordService,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, RepoError> {
        let Some(user) = users.find_by_username(username).await? else {
            return Ok(None);
        };

        if hasher.verify(password, &user.password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// An unsaved user, staged through a unit of work.
///
/// `username` and `email` are optional so that missing values reach the
/// store and fail there as integrity violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl NewUser {
    /// Create a user with an already prepared password value.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
            email: Some(email.into()),
            password: password.into(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: None,
            location: None,
        }
    }

    /// Use an explicit primary key instead of the generated one.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    pub fn with_header_image_url(mut self, url: impl Into<String>) -> Self {
        self.header_image_url = url.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A user together with its loaded relationships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRelations {
    pub user: User,
    /// Newest first.
    pub messages: Vec<Message>,
    /// Users following this user.
    pub followers: Vec<User>,
    /// Users this user follows.
    pub following: Vec<User>,
}

impl UserRelations {
    pub fn is_followed_by(&self, other: &User) -> bool {
        self.followers.iter().any(|u| u.id == other.id)
    }

    pub fn is_following(&self, other: &User) -> bool {
        self.following.iter().any(|u| u.id == other.id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::ports::{AuthError, BaseRepository};

    /// Reversible stand-in so tests do not pay for a real slow hash.
    struct FakeHasher;

    impl PasswordService for FakeHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("$fake${}", password.chars().rev().collect::<String>()))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            self.hash(password).map(|h| h == hash).unwrap_or(false)
        }
    }

    struct FailingHasher;

    impl PasswordService for FailingHasher {
        fn hash(&self, _password: &str) -> Result<String, AuthError> {
            Err(AuthError::HashingError("out of memory".to_string()))
        }

        fn verify(&self, _password: &str, _hash: &str) -> bool {
            false
        }
    }

    struct InMemoryUserRepository {
        users: HashMap<i32, User>,
    }

    impl InMemoryUserRepository {
        fn with(users: Vec<User>) -> Self {
            Self {
                users: users.into_iter().map(|u| (u.id, u)).collect(),
            }
        }
    }

    #[async_trait]
    impl BaseRepository<User, i32> for InMemoryUserRepository {
        async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
            Ok(self.users.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<User>, RepoError> {
            Ok(self.users.values().cloned().collect())
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
            Ok(self.users.values().find(|u| u.username == username).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self.users.values().find(|u| u.email == email).cloned())
        }

        async fn followers(&self, _user_id: i32) -> Result<Vec<User>, RepoError> {
            Ok(vec![])
        }

        async fn following(&self, _user_id: i32) -> Result<Vec<User>, RepoError> {
            Ok(vec![])
        }

        async fn is_following(&self, _follower: i32, _followed: i32) -> Result<bool, RepoError> {
            Ok(false)
        }

        async fn load_relations(&self, _user_id: i32) -> Result<Option<UserRelations>, RepoError> {
            Ok(None)
        }
    }

    fn user(id: i32, username: &str, email: &str, password: &str) -> User {
        User {
            id,
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: None,
            location: None,
        }
    }

    #[test]
    fn test_signup_hashes_password() {
        let new_user = User::signup(
            Some("testuser3"),
            Some("test3@test.com"),
            Some("Password3"),
            Some("https://example.com/puffin.jpg"),
            &FakeHasher,
        )
        .unwrap();

        assert_ne!(new_user.password, "Password3");
        assert!(new_user.password.starts_with("$fake$"));
        assert_eq!(new_user.username.as_deref(), Some("testuser3"));
        assert_eq!(new_user.image_url, "https://example.com/puffin.jpg");
        assert_eq!(new_user.id, None);
    }

    #[test]
    fn test_signup_defaults_image() {
        let new_user =
            User::signup(Some("u"), Some("u@test.com"), Some("pw"), None, &FakeHasher).unwrap();
        assert_eq!(new_user.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(new_user.header_image_url, DEFAULT_HEADER_IMAGE_URL);
    }

    #[test]
    fn test_signup_rejects_empty_or_missing_password() {
        let empty = User::signup(Some("testtest"), Some("email@email.com"), Some(""), None, &FakeHasher);
        assert!(matches!(empty, Err(DomainError::Validation(_))));

        let missing = User::signup(Some("testtest"), Some("email@email.com"), None, None, &FakeHasher);
        assert!(matches!(missing, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_signup_accepts_missing_username_and_email() {
        let no_username = User::signup(None, Some("test@test.com"), Some("password"), None, &FakeHasher);
        assert!(no_username.unwrap().username.is_none());

        let no_email = User::signup(Some("testtest"), None, Some("password"), None, &FakeHasher);
        assert!(no_email.unwrap().email.is_none());
    }

    #[test]
    fn test_signup_surfaces_hasher_failure() {
        let result = User::signup(Some("u"), Some("u@test.com"), Some("pw"), None, &FailingHasher);
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }

    #[test]
    fn test_display_format() {
        let u = user(1111, "testuser", "test@test.com", "x");
        assert_eq!(u.to_string(), "<User #1111: testuser, test@test.com>");
    }

    #[test]
    fn test_password_not_serialized() {
        let u = user(1, "testuser", "test@test.com", "$fake$secret");
        let json = serde_json::to_value(&u).unwrap();

        assert_eq!(json["username"], "testuser");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_relations_direction() {
        let a = user(1, "a", "a@test.com", "x");
        let b = user(2, "b", "b@test.com", "x");

        // b follows a
        let a_rel = UserRelations {
            user: a.clone(),
            messages: vec![],
            followers: vec![b.clone()],
            following: vec![],
        };

        assert!(a_rel.is_followed_by(&b));
        assert!(!a_rel.is_following(&b));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let hashed = FakeHasher.hash("Password3").unwrap();
        let repo = InMemoryUserRepository::with(vec![user(3, "testuser3", "t3@test.com", &hashed)]);

        let found = User::authenticate(&repo, &FakeHasher, "testuser3", "Password3")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(3));

        let wrong = User::authenticate(&repo, &FakeHasher, "testuser3", "nope")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = User::authenticate(&repo, &FakeHasher, "ghost", "Password3")
            .await
            .unwrap();
        assert!(unknown.is_none());
    }
}
