//! `mathrelax chat`: Terminal tutoring session.
//!
//! Mirrors the web page: the student's name is asked first, then every line
//! typed is one message to the tutor.

use std::io::Write;

use mathrelax_config::AppConfig;
use mathrelax_core::error::SessionError;
use mathrelax_core::session::Session;
use mathrelax_tutor::{Reply, Tutor};
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(name: Option<String>, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early: give a clear error
    if let Err(e) = config.require_api_key() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export GOOGLE_API_KEY='AIza...'      (recommended)");
        eprintln!("    export MATHRELAX_API_KEY='AIza...'");
        eprintln!();
        eprintln!("  Or put the key in {}", config.api_key_file.display());
        eprintln!("  or in {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let tutor = mathrelax_gateway::build_tutor(&config).await?;
    let tutor_name = tutor.persona().tutor_name.clone();
    let mut session = Session::new();
    let mut lines = BufReader::new(io::stdin()).lines();

    // Name first
    let mut candidate = name;
    let started = loop {
        let name = match candidate.take() {
            Some(name) => name,
            None => {
                prompt("  Nama kamu > ")?;
                match lines.next_line().await? {
                    Some(line) => line,
                    None => return Ok(()),
                }
            }
        };

        match tutor.submit_name(&mut session, &name) {
            Ok(started) => break started,
            Err(SessionError::EmptyName) => {
                println!("  Namanya diisi dulu ya.");
            }
            Err(e) => return Err(e.into()),
        }
    };

    if let Some(msg) = message {
        // Single message mode
        let reply = ask(&tutor, &mut session, &msg).await?;
        println!("{}", reply.text());
        tutor.flush_logbook().await;
        return Ok(());
    }

    println!();
    println!("  Math Relax: belajar pecahan santai");
    println!("  Model: {}   Log: {}", tutor.dispatcher().model(), tutor.logbook_name());
    println!("  Ketik 'exit' untuk keluar.");
    println!();
    print_lines(&tutor_name, &started.greeting);

    loop {
        prompt(&format!("  {} > ", started.student_name))?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        let reply = ask(&tutor, &mut session, &line).await?;
        print_lines(&tutor_name, reply.text());
    }

    tutor.flush_logbook().await;

    println!();
    println!("  Sampai jumpa, {}! 👋", started.student_name);
    println!();

    Ok(())
}

async fn ask(tutor: &Tutor, session: &mut Session, text: &str) -> Result<Reply, SessionError> {
    eprint!("  ...");
    let reply = tutor.submit_message(session, text).await;
    eprint!("\r     \r");
    reply
}

fn print_lines(speaker: &str, text: &str) {
    println!();
    for line in text.lines() {
        println!("  {speaker} > {line}");
    }
    println!();
}

fn prompt(label: &str) -> std::io::Result<()> {
    print!("{label}");
    std::io::stdout().flush()
}
