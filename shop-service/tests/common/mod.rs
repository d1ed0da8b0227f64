use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashCost;
use auth::PasswordHasher;
use auth::SigningKey;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use shop_service::domain::product::models::CreateProductCommand;
use shop_service::domain::product::models::Product;
use shop_service::domain::product::models::ProductId;
use shop_service::domain::product::service::ProductService;
use shop_service::domain::user::models::EmailAddress;
use shop_service::domain::user::models::NewUser;
use shop_service::domain::user::models::User;
use shop_service::domain::user::models::UserId;
use shop_service::domain::user::service::UserService;
use shop_service::inbound::http::router::create_router;
use shop_service::product::errors::ProductError;
use shop_service::product::ports::ProductRepository;
use shop_service::user::errors::UserError;
use shop_service::user::ports::UserRepository;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub users: Arc<InMemoryUserRepository>,
    pub products: Arc<InMemoryProductRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap Argon2 parameters keep the suite fast
        let password_hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to create password hasher");
        let authenticator = Arc::new(
            Authenticator::new(
                SigningKey::from_secret(JWT_SECRET).expect("Failed to create signing key"),
                Duration::hours(24),
            )
            .with_password_hasher(password_hasher),
        );

        let users = Arc::new(InMemoryUserRepository::default());
        let products = Arc::new(InMemoryProductRepository::default());

        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::clone(&authenticator),
        ));
        let product_service = Arc::new(ProductService::new(Arc::clone(&products)));

        let router = create_router(user_service, product_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
            users,
            products,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, email: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/v1/register")
            .json(&json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register a user, log in and return the access token
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;

        let response = self
            .post("/api/v1/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Seed a product directly into the store
    pub async fn seed_product(&self, name: &str, price: f64) -> Product {
        let command = CreateProductCommand::new(
            name.to_string(),
            format!("{} description", name),
            format!("{}.png", name.to_lowercase()),
            price,
            10,
        )
        .expect("Invalid product");
        self.products
            .create(command)
            .await
            .expect("Failed to seed product")
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Remove a user, as if the account had been deleted
    pub fn remove(&self, id: UserId) {
        self.users.lock().unwrap().retain(|user| user.id != id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        let next_id = users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let created = user.with_id(UserId(next_id));
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == *email).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|product| product.id == *id).cloned())
    }

    async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        let mut products = self.products.lock().unwrap();
        let next_id = products.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let product = Product {
            id: ProductId(next_id),
            name: command.name,
            description: command.description,
            image: command.image,
            price: command.price,
            quantity: command.quantity,
            created_at: Utc::now(),
        };
        products.push(product.clone());
        Ok(product)
    }
}
