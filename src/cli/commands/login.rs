use crate::cli::commands::{open_pool, pending_notice};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{Access, SessionContext, redirect_url};
use crate::db::log::ttlog_soft;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, RESET, YELLOW};
use chrono::Utc;

/// `login`, `logout` and `whoami`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let ctx = SessionContext::from_config(cfg);

    match cmd {
        Commands::Login { email, name } => {
            let pool = open_pool(cfg)?;
            let access = ctx.sign_in(&pool, email, name.as_deref(), Utc::now())?;
            let session = access.session();

            success(format!("Signed in as {} <{}>", session.display_name, session.email));
            info(format!("Callback URL: {}", redirect_url(&cfg.site_url())));

            match &access {
                Access::Granted(s) if s.is_admin => info("You are an administrator."),
                Access::Granted(_) => {}
                Access::PendingApproval(s) => pending_notice(s),
            }
        }

        Commands::Logout => match ctx.sign_out()? {
            Some(previous) => {
                if let Ok(pool) = open_pool(cfg) {
                    ttlog_soft(&pool.conn, "logout", &previous.email, "Signed out");
                }
                success(format!("Signed out {}", previous.email));
            }
            None => info("Nobody is signed in."),
        },

        Commands::Whoami => {
            let pool = open_pool(cfg)?;
            match ctx.resolve(&pool, Utc::now()) {
                Ok(access) => {
                    let s = access.session();
                    let status = match (&access, s.is_admin) {
                        (_, true) => format!("{GREEN}administrator{RESET}"),
                        (Access::Granted(_), false) => format!("{GREEN}approved{RESET}"),
                        (Access::PendingApproval(_), false) => {
                            format!("{YELLOW}pending approval{RESET}")
                        }
                    };
                    println!("👤 {} <{}>", s.display_name, s.email);
                    println!("   status : {status}");
                    println!(
                        "   checked: {}",
                        s.checked_at
                            .with_timezone(&chrono::Local)
                            .format("%Y-%m-%d %H:%M")
                    );
                }
                Err(AppError::NotSignedIn) => info("Nobody is signed in."),
                Err(e) => return Err(e),
            }
        }

        _ => {}
    }

    Ok(())
}
