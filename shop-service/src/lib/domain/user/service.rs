use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let user = NewUser {
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticationResult, UserError> {
        let user = match EmailAddress::new(command.email) {
            Ok(email) => self.repository.find_by_email(&email).await?,
            Err(_) => None,
        };

        // No account: pay for a password check anyway so the response time
        // does not reveal which emails are registered.
        let Some(user) = user else {
            self.authenticator
                .simulate_password_check(&command.password);
            return Err(UserError::InvalidCredentials);
        };

        self.authenticator
            .authenticate(&command.password, &user.password_hash, user.id)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                AuthenticationError::SigningError(err) => UserError::Signing(err),
            })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use auth::HashCost;
    use auth::PasswordHasher;
    use auth::SigningKey;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::NewPassword;
    use crate::domain::user::models::PersonName;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        let key = SigningKey::from_secret(b"test-secret-key-for-jwt-signing-at-least-32-bytes")
            .unwrap();
        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        Arc::new(Authenticator::new(key, Duration::hours(24)).with_password_hasher(hasher))
    }

    fn stored_user(id: i64, password: &str, authenticator: &Authenticator) -> User {
        User {
            id: UserId(id),
            first_name: PersonName::new("Ada".to_string()).unwrap(),
            last_name: PersonName::new("Lovelace".to_string()).unwrap(),
            email: EmailAddress::new("ada@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn register_command() -> RegisterUserCommand {
        RegisterUserCommand::new(
            PersonName::new("Ada".to_string()).unwrap(),
            PersonName::new("Lovelace".to_string()).unwrap(),
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            NewPassword::new("password123".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "ada@example.com"
                    && user.password_hash.starts_with("$argon2id$")
            })
            .times(1)
            .returning(|user| Ok(user.with_id(UserId(1))));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let user = service
            .register_user(register_command())
            .await
            .expect("Registration failed");

        assert_eq!(user.id, UserId(1));
        assert_eq!(user.first_name.as_str(), "Ada");
        // Password is hashed with real Argon2
        assert!(authenticator.verify_password("password123", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();

        let existing = stored_user(7, "other", &authenticator);
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service.register_user(register_command()).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();

        let user = stored_user(42, "password123", &authenticator);
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "ada@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let result = service
            .login(LoginCommand {
                email: "ada@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .expect("Login failed");

        let subject = authenticator
            .validate_token(&result.access_token)
            .expect("Token should validate");
        assert_eq!(subject, "42");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let authenticator = authenticator();

        let mut repository = MockTestUserRepository::new();
        let user = stored_user(42, "password123", &authenticator);
        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "ada@example.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = UserService::new(Arc::new(repository), authenticator);

        let wrong_password = service
            .login(LoginCommand {
                email: "ada@example.com".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginCommand {
                email: "ghost@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        let invalid_email = service
            .login(LoginCommand {
                email: "not-an-email".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert!(matches!(unknown_email, UserError::InvalidCredentials));
        assert!(matches!(invalid_email, UserError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_without_account_costs_a_password_check() {
        let key = SigningKey::from_secret(b"test-secret-key-for-jwt-signing-at-least-32-bytes")
            .unwrap();
        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 8192,
            iterations: 3,
            parallelism: 1,
        })
        .unwrap();
        let authenticator =
            Arc::new(Authenticator::new(key, Duration::hours(24)).with_password_hasher(hasher));

        let mut repository = MockTestUserRepository::new();
        let user = stored_user(42, "password123", &authenticator);
        repository.expect_find_by_email().returning(move |email| {
            if email.as_str() == "ada@example.com" {
                Ok(Some(user.clone()))
            } else {
                Ok(None)
            }
        });
        let service = UserService::new(Arc::new(repository), authenticator);

        let attempt = |email: &str| LoginCommand {
            email: email.to_string(),
            password: "nope".to_string(),
        };

        // First miss hashes the decoy; keep it out of the measurement.
        let _ = service.login(attempt("ghost@example.com")).await;

        let mut wrong_password = std::time::Duration::ZERO;
        let mut unknown_email = std::time::Duration::ZERO;
        let mut invalid_email = std::time::Duration::ZERO;
        for _ in 0..3 {
            let started = Instant::now();
            let _ = service.login(attempt("ada@example.com")).await;
            wrong_password += started.elapsed();

            let started = Instant::now();
            let _ = service.login(attempt("ghost@example.com")).await;
            unknown_email += started.elapsed();

            let started = Instant::now();
            let _ = service.login(attempt("not-an-email")).await;
            invalid_email += started.elapsed();
        }

        assert!(
            unknown_email * 4 > wrong_password,
            "unknown email {:?} vs wrong password {:?}",
            unknown_email,
            wrong_password
        );
        assert!(
            invalid_email * 4 > wrong_password,
            "invalid email {:?} vs wrong password {:?}",
            invalid_email,
            wrong_password
        );
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = authenticator();

        let user = stored_user(42, "password123", &authenticator);
        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(42))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let user = service.get_user(&UserId(42)).await.expect("Lookup failed");
        assert_eq!(user.id, UserId(42));
        assert_eq!(user.email.as_str(), "ada@example.com");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.get_user(&UserId(99)).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
