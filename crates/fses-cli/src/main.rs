use fses_cli::seeder::{self, SeedConfig};
use fses_models::Role;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;

#[derive(Parser)]
#[command(name = "fses-cli")]
#[command(about = "FSES CLI - Administrative tools for the FSES API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a login account
    CreateUser {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// OFFICE_ASSISTANT, SUPERVISOR, PROGRAM_COORDINATOR or PGAM
        #[arg(short = 'r', long)]
        role: Option<Role>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Insert the demo departments, lecturers, accounts, students and nominations
    Populate,
    /// Seed fake lecturers (with accounts) and students
    Seed {
        /// Number of lecturers to create
        #[arg(short = 'l', long, default_value = "10")]
        lecturers: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "20")]
        students: usize,
    },
    /// Delete all departments, lecturers, students and nominations (keeps non-lecturer accounts)
    Clear,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateUser {
            username,
            email,
            role,
            password,
        } => handle_create_user(&pool, username, email, role, password).await,
        Commands::Populate => handle_populate(&pool).await,
        Commands::Seed {
            lecturers,
            students,
        } => handle_seed(&pool, lecturers, students).await,
        Commands::Clear => handle_clear(&pool).await,
    }
}

async fn handle_create_user(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    email: Option<String>,
    role: Option<Role>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .interact_text()
            .expect("Failed to read username")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let role = role.unwrap_or_else(|| {
        let labels: Vec<&str> = Role::ALL.iter().map(Role::label).collect();
        let idx = Select::new()
            .with_prompt("Role")
            .items(&labels)
            .default(0)
            .interact()
            .expect("Failed to read role");
        Role::ALL[idx]
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_user_internal(pool, &username, &email, role, &password).await {
        Ok(_) => {
            println!("\n✅ User created successfully!");
            println!("   Username: {}", username);
            println!("   Email: {}", email);
            println!("   Role: {}", role.label());
        }
        Err(e) => {
            eprintln!("\n❌ Error creating user: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_populate(pool: &sqlx::postgres::PgPool) {
    println!("📦 Populating reference data...");
    match seeder::populate_reference_data(pool).await {
        Ok(_) => {
            println!("\n✅ Reference data is in place");
            println!("   Demo accounts use password: {}", seeder::reference::DEMO_PASSWORD);
        }
        Err(e) => {
            eprintln!("\n❌ Error populating database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, lecturers: usize, students: usize) {
    match seeder::seed_all(pool, SeedConfig::new(lecturers, students)).await {
        Ok(_) => {}
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear(pool: &sqlx::postgres::PgPool) {
    match seeder::clear_all(pool).await {
        Ok(_) => {
            println!("✅ Cleared domain data");
        }
        Err(e) => {
            eprintln!("\n❌ Error clearing data: {}", e);
            std::process::exit(1);
        }
    }
}

/// Inserts an account that can log in straight away, without the forced
/// first-login password change.
async fn create_user_internal(
    db: &sqlx::postgres::PgPool,
    username: &str,
    email: &str,
    role: Role,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password = fses_core::hash_password(password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password, role, is_first_time)
         VALUES ($1, $2, $3, $4, FALSE)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&hashed_password)
    .bind(role)
    .fetch_optional(db)
    .await?;

    if user_id.is_none() {
        return Err(format!("User '{}' already exists", username).into());
    }

    Ok(())
}
