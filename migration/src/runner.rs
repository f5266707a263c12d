use colored::*;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

use crate::Migrator;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration one at a time, printing a status line for each.
///
/// Applied migrations are recorded, so running this twice is a no-op.
pub async fn run_pending_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        println!("{}", "Nothing to migrate".dimmed());
        return Ok(0);
    }

    println!("Running migrations...");
    for migration in &pending {
        let name_str = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name_str.len()));
        print!("{}{} ", name_str, dots);
        io::stdout().flush().ok();

        let start = Instant::now();
        match Migrator::up(db, Some(1)).await {
            Ok(()) => {
                let time_str = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), time_str);
            }
            Err(err) => {
                println!("{}", "failed".red());
                return Err(err);
            }
        }
    }

    Ok(pending.len())
}
