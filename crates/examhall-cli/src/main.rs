use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use examhall_db::{PgAccountStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "examhall-cli")]
#[command(about = "Examhall CLI - Administrative tools for Examhall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// super_admin, campus_admin or course_admin
        #[arg(short = 'r', long)]
        role: String,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Print the module registry and action flags
    Modules,
    /// Print the default policy of a role as JSON
    Defaults {
        role: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            role,
            name,
            email,
            password,
        } => handle_create_admin(role, name, email, password).await,
        Commands::Migrate => handle_migrate().await,
        Commands::Modules => print!("{}", examhall_cli::render_modules()),
        Commands::Defaults { role } => match examhall_cli::render_defaults(&role) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
    }
}

async fn handle_create_admin(
    role: String,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let name = name.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Name")
            .interact_text()
            .expect("Failed to read name")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    let store = PgAccountStore::new(init_db_pool().await);

    match examhall_cli::create_admin(&store, &role, &name, &email, &password).await {
        Ok(account) => {
            println!("\n✅ Admin created successfully!");
            println!("   Id: {}", account.id);
            println!("   Email: {}", account.email);
            println!("   Role: {}", account.role);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_migrate() {
    let pool = init_db_pool().await;
    match run_migrations(&pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => {
            eprintln!("\n❌ Error applying migrations: {}", e);
            std::process::exit(1);
        }
    }
}
