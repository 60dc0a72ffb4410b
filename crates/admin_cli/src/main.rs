//! Admin utilities for Divvy (bootstrap profiles/groups).
//!
//! Profiles normally appear on a user's first authenticated request; this
//! tool lets an operator provision them ahead of time, e.g. to seed a local
//! database.

use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::Engine;
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

mod profiles {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub email: String,
        pub full_name: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "divvy_admin")]
#[command(about = "Admin utilities for Divvy (bootstrap profiles/groups)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./divvy.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Profile(Profile),
    Group(Group),
}

#[derive(Args, Debug)]
struct Profile {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Create(ProfileCreateArgs),
}

#[derive(Args, Debug)]
struct ProfileCreateArgs {
    /// Stable user id, as the identity provider reports it.
    #[arg(long)]
    id: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    full_name: Option<String>,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    /// Profile id of the admin-to-be.
    #[arg(long)]
    admin: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
}

async fn connect_db(database_url: &str) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::Profile(Profile {
            command: ProfileCommand::Create(args),
        }) => {
            if profiles::Entity::find_by_id(args.id.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("profile already exists: {}", args.id);
                std::process::exit(1);
            }

            let profile = profiles::ActiveModel {
                id: Set(args.id.clone()),
                email: Set(args.email),
                full_name: Set(args.full_name),
            };
            profiles::Entity::insert(profile).exec(&db).await?;

            println!("created profile: {}", args.id);
        }
        Command::Group(Group {
            command: GroupCommand::Create(args),
        }) => {
            if profiles::Entity::find_by_id(args.admin.clone())
                .one(&db)
                .await?
                .is_none()
            {
                eprintln!("profile not found: {}", args.admin);
                std::process::exit(1);
            }

            let engine = Engine::builder().database(db.clone()).build().await?;
            let group = engine
                .new_group(&args.name, &args.description, &args.admin)
                .await?;
            println!("created group: {} ({})", group.name, group.id);
        }
    }

    Ok(())
}
