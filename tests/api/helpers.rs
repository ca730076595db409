use campaigner::{
    configuration::{get_configuration, DatabaseSettings},
    startup::{get_pg_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use uuid::Uuid;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, default_env_filter, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, default_env_filter, std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    pub email_server: MockServer,
    client: Client,
}

impl TestApp {
    /// Spawn the app against a lazily-connected pool. Enough for endpoints
    /// that never touch the database.
    pub async fn spawn() -> Self {
        Self::spawn_inner(false).await
    }

    /// Spawn the app with a freshly created and migrated database.
    pub async fn spawn_with_database() -> Self {
        Self::spawn_inner(true).await
    }

    async fn spawn_inner(create_database: bool) -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.database.database_name = Uuid::new_v4().to_string();
        config.application.port = 0;

        let email_server = MockServer::start().await;
        config.email_client.base_url = email_server.uri();

        if create_database {
            configure_database(&config.database).await;
        }
        let db_pool = get_pg_connection_pool(&config.database);

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            db_pool,
            email_server,
            client: Client::new(),
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_launch(&self, mailing_id: Uuid, actor: Option<Uuid>) -> Response {
        let mut request = self
            .client
            .post(self.url(&format!("/mailings/{mailing_id}/launch")));
        if let Some(actor) = actor {
            request = request.header("X-User-Id", actor.to_string());
        }
        request.send().await.expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn seed_user(&self, is_manager: bool, is_superuser: bool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, username, is_manager, is_superuser) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(format!("user-{id}"))
        .bind(is_manager)
        .bind(is_superuser)
        .execute(&self.db_pool)
        .await
        .expect("Failed to seed user");
        id
    }

    pub async fn seed_mailing(
        &self,
        owner: Uuid,
        is_active: bool,
        recipient_emails: &[&str],
    ) -> Uuid {
        self.seed_mailing_with_subject(owner, is_active, "Campaign update", recipient_emails)
            .await
    }

    pub async fn seed_mailing_with_subject(
        &self,
        owner: Uuid,
        is_active: bool,
        subject: &str,
        recipient_emails: &[&str],
    ) -> Uuid {
        let message_id = Uuid::new_v4();
        sqlx::query("INSERT INTO messages (id, subject, body, owner) VALUES ($1, $2, $3, $4)")
            .bind(message_id)
            .bind(subject)
            .bind("Hello from the campaign.")
            .bind(owner)
            .execute(&self.db_pool)
            .await
            .expect("Failed to seed message");

        let mailing_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO mailings (id, message_id, start_time, end_time, status, is_active, owner)
             VALUES ($1, $2, now() - interval '5 minutes', NULL, 'created', $3, $4)",
        )
        .bind(mailing_id)
        .bind(message_id)
        .bind(is_active)
        .bind(owner)
        .execute(&self.db_pool)
        .await
        .expect("Failed to seed mailing");

        for email in recipient_emails {
            let recipient_id = Uuid::new_v4();
            sqlx::query("INSERT INTO recipients (id, email, owner) VALUES ($1, $2, $3)")
                .bind(recipient_id)
                .bind(email)
                .bind(owner)
                .execute(&self.db_pool)
                .await
                .expect("Failed to seed recipient");
            sqlx::query(
                "INSERT INTO mailing_recipients (mailing_id, recipient_id) VALUES ($1, $2)",
            )
            .bind(mailing_id)
            .bind(recipient_id)
            .execute(&self.db_pool)
            .await
            .expect("Failed to seed mailing recipient");
        }

        mailing_id
    }

    pub async fn mailing_status(&self, mailing_id: Uuid) -> String {
        sqlx::query_scalar("SELECT status FROM mailings WHERE id = $1")
            .bind(mailing_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to fetch mailing status")
    }

    pub async fn attempt_count(&self, mailing_id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT count(*) FROM attempts WHERE mailing_id = $1")
            .bind(mailing_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count attempts")
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

async fn configure_database(configuration: &DatabaseSettings) {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = get_pg_connection_pool(configuration);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");
}
