use colored::*;
use futures::FutureExt;
use sea_orm::DatabaseConnection;
use services::service::AppError;
use std::io::{self, Write};
use std::pin::Pin;
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

pub trait Seeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'a>>;
}

/// Runs one seeder behind a status line. Exits the process on failure.
pub async fn run_seeder<S: Seeder + ?Sized>(seeder: &S, name: &str, db: &DatabaseConnection) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    match std::panic::AssertUnwindSafe(seeder.seed(db))
        .catch_unwind()
        .await
    {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(err)) => {
            println!("{}", "failed".red());
            log::error!("Seeder {} failed: {}", name, err);
            eprintln!("{}", err);
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}

/// Twelve random hex digits in a random separator style.
pub fn random_mac() -> String {
    let digits: Vec<String> = (0..6).map(|_| format!("{:02x}", fastrand::u8(..))).collect();
    match fastrand::u8(..3) {
        0 => digits.join(":"),
        1 => digits.join("-").to_uppercase(),
        _ => digits.concat(),
    }
}

/// The `n`th host address of a `/16` such as `"10.10"`, skipping the first
/// ten of every network. `None` once the block is used up.
pub fn host_ip(prefix: &str, n: usize) -> Option<String> {
    let host = n.checked_add(10)?;
    let (third, fourth) = (host / 256, host % 256);
    (third <= 255).then(|| format!("{}.{}.{}", prefix, third, fourth))
}
