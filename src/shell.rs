use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::autolock::AutoRelock;
use crate::error::Error;
use crate::gateway::{GatewayError, PlatformClient};
use crate::lock::{AppLock, LockState};
use crate::store::LockStore;

/// Interactive presentation loop: renders current state, offers the three
/// actions, and prints typed failures as messages. No protocol logic lives
/// here.
pub async fn run<S, P>(lock: Arc<AppLock<S, P>>, auto: Option<AutoRelock>) -> anyhow::Result<()>
where
    S: LockStore + Send + 'static,
    P: PlatformClient + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&lock);
    print_help();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => {}
            "status" => render(&lock),
            "enroll" => match lock.enroll().await {
                Ok(()) => {
                    println!("Enrollment complete.");
                    render(&lock);
                }
                Err(e) => println!("{}", render_error(&e)),
            },
            "unlock" => match lock.unlock().await {
                Ok(()) => {
                    if let Some(auto) = &auto {
                        auto.arm(lock.clone());
                    }
                    render(&lock);
                }
                Err(e) => println!("{}", render_error(&e)),
            },
            "lock" => match lock.relock().await {
                Ok(()) => {
                    if let Some(auto) = &auto {
                        auto.disarm();
                    }
                    render(&lock);
                }
                Err(e) => println!("{}", render_error(&e)),
            },
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command: {other} (try `help`)"),
        }
    }
    Ok(())
}

fn render<S: LockStore, P: PlatformClient>(lock: &AppLock<S, P>) {
    match lock.state() {
        LockState::Unlocked => {
            println!("Status: unlocked");
            println!("  lock    re-lock the application");
        }
        LockState::Locked => {
            println!("Status: locked");
            if lock.has_credential() {
                println!("  unlock  verify with the device credential");
                println!("  enroll  re-register the device credential");
            } else {
                println!("  enroll  first use: register a device credential");
            }
        }
    }
}

fn print_help() {
    println!("Commands: status, enroll, unlock, lock, help, quit");
}

fn render_error(e: &Error) -> String {
    match e {
        Error::Busy => "An authenticator prompt is already in progress.".to_string(),
        Error::Gateway(GatewayError::Unsupported) => {
            "No platform authenticator is available on this device.".to_string()
        }
        Error::Gateway(GatewayError::NoCredential) => {
            "No credential enrolled. Run `enroll` first.".to_string()
        }
        Error::Gateway(GatewayError::Enrollment(reason)) => {
            format!("Enrollment failed: {reason}. Try again.")
        }
        Error::Gateway(GatewayError::Verification(reason)) => {
            format!("Verification failed: {reason}. Try again.")
        }
        Error::Store(e) => format!("Storage failure: {e}. The lock state was not changed."),
        Error::Codec(e) => format!("Corrupt credential record: {e}. Re-enroll to recover."),
    }
}
