use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use ledgerwise::{
    ChallengeStore, LedgerStore, NewChallenge, NewTransaction, NewUser, TransactionKind,
    UserStore, sqlite::create_app_state,
};

/// A utility for creating a demo database for the ledgerwise core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let mut state = create_app_state(conn)?;

    println!("Creating demo user...");
    let user = state.user_store.create(NewUser {
        email: "demo@example.com".to_string(),
        display_name: "Demo User".to_string(),
        password_hash: "not-a-real-hash".to_string(),
    })?;

    println!("Recording demo transactions...");
    let today = OffsetDateTime::now_utc().date();
    let mut outcome = None;
    let movements = [
        (2500.0, "Salary", Some(TransactionKind::Income)),
        (-650.0, "Rent", None),
        (-120.45, "Groceries", None),
        (-39.99, "Streaming subscriptions", Some(TransactionKind::Expense)),
        (150.0, "Side gig", None),
    ];

    for (amount, description, kind) in movements {
        let mut request = NewTransaction::new(amount, description, today);
        if let Some(kind) = kind {
            request = request.kind(kind);
        }

        outcome = Some(state.ledger_store.append_transaction(user.id(), request)?);
    }

    println!("Creating demo savings challenge...");
    let challenge = state.challenge_store.create(NewChallenge {
        user_email: user.email().to_string(),
        title: "Save $200 this month".to_string(),
        goal_amount: 200.0,
        start_date: Some(today),
        end_date: None,
    })?;
    state.challenge_store.update_progress(challenge.id, 75.0)?;

    if let Some(outcome) = outcome {
        println!(
            "Success! Balance: {:.2}, credit score: {}",
            outcome.new_balance, outcome.new_score
        );
    }

    Ok(())
}
