use migration::runner;
use std::{env, fs, path::Path};
use util::config;

#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);

    match env::args().nth(1).as_deref() {
        Some("clean") => {
            remove_db_file(&db_path);
            return;
        }
        Some("fresh") => remove_db_file(&db_path),
        _ => {}
    }

    create_db_dir(&db_path);
    let db = sea_orm::Database::connect(&url)
        .await
        .expect("DB connection failed");

    if let Err(err) = runner::run_pending_migrations(&db).await {
        eprintln!("Migration failed: {}", err);
        std::process::exit(1);
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
