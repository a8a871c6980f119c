use clap::{Args as ClapArgs, Parser};
use meallog_core::domain::common::{
    DatabaseConfig, MealLogConfig, ObjectStorageConfig, RecognitionConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "meallog-api", version, about = "MealLog API server")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub object_storage: ObjectStorageArgs,

    #[command(flatten)]
    pub recognition: RecognitionArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(id = "server-host", long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(id = "server-port", long = "server-port", env = "PORT", default_value_t = 8001)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "server-allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub allowed_origins: Vec<String>,

    /// Address advertised by the health endpoint.
    #[arg(id = "server-public-url", long = "server-public-url", env = "SERVER_PUBLIC_URL")]
    pub public_url: Option<String>,
}

impl ServerArgs {
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct DatabaseArgs {
    #[arg(id = "database-host", long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(id = "database-port", long = "database-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "postgres")]
    pub user: String,

    #[arg(long = "database-password", env = "DATABASE_PASSWORD", default_value = "postgres")]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "meallog")]
    pub name: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ObjectStorageArgs {
    #[arg(long = "minio-endpoint", env = "MINIO_ENDPOINT", default_value = "http://localhost:9000")]
    pub endpoint: String,

    /// Base URL clients and the recognition service use to fetch images.
    #[arg(id = "minio-public-url", long = "minio-public-url", env = "MINIO_PUBLIC_URL", default_value = "http://localhost:9000")]
    pub public_url: String,

    #[arg(long = "minio-region", env = "MINIO_REGION", default_value = "us-east-1")]
    pub region: String,

    #[arg(long = "minio-access-key", env = "MINIO_ACCESS_KEY", default_value = "minioadmin")]
    pub access_key: String,

    #[arg(long = "minio-secret-key", env = "MINIO_SECRET_KEY", default_value = "minioadmin")]
    pub secret_key: String,

    #[arg(long = "minio-bucket", env = "MINIO_BUCKET", default_value = "meallog-uploads")]
    pub bucket: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct RecognitionArgs {
    #[arg(long = "recognition-url", env = "RECOGNITION_URL", default_value = "http://127.0.0.1:5000")]
    pub url: String,

    #[arg(long = "recognition-timeout-secs", env = "RECOGNITION_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for MealLogConfig {
    fn from(args: Args) -> Self {
        MealLogConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
            },
            object_storage: ObjectStorageConfig {
                endpoint: args.object_storage.endpoint,
                public_url: args.object_storage.public_url,
                region: args.object_storage.region,
                access_key: args.object_storage.access_key,
                secret_key: args.object_storage.secret_key,
                bucket: args.object_storage.bucket,
            },
            recognition: RecognitionConfig {
                url: args.recognition.url,
                timeout_secs: args.recognition.timeout_secs,
            },
        }
    }
}
