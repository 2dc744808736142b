use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::admin::AdminLogic;
use crate::core::session::SessionContext;
use crate::errors::AppResult;
use crate::models::profile::Profile;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREEN, RESET, YELLOW};
use crate::utils::table::Table;
use chrono::Utc;

fn print_profiles(profiles: &[Profile]) {
    let mut table = Table::new(vec!["Id", "E-mail", "Name", "Role"]);
    for p in profiles {
        let role = if p.is_admin {
            format!("{GREEN}admin{RESET}")
        } else if p.is_approved {
            format!("{GREEN}approved{RESET}")
        } else {
            format!("{YELLOW}pending{RESET}")
        };
        table.add_row(vec![p.id.to_string(), p.email.clone(), p.display_name(), role]);
    }
    print!("{}", table.render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let pool = open_pool(cfg)?;
        let ctx = SessionContext::from_config(cfg);
        ctx.require_admin(&pool, Utc::now())?;

        match action {
            UserAction::List => {
                let (pending, approved) = AdminLogic::list_users(&pool)?;

                header(format!("Pending approval ({})", pending.len()));
                if pending.is_empty() {
                    info("Nobody is waiting.");
                } else {
                    print_profiles(&pending);
                }

                println!();
                header(format!("Users with access ({})", approved.len()));
                print_profiles(&approved);
            }

            UserAction::Approve { email } | UserAction::Revoke { email } => {
                let approve = matches!(action, UserAction::Approve { .. });
                let profile = AdminLogic::set_approval(&pool, email, approve)?;
                ctx.on_profile_changed(&profile, Utc::now())?;

                if approve {
                    success(format!("{} can now use kajalog.", profile.email));
                } else {
                    success(format!("Access of {} has been revoked.", profile.email));
                }
            }
        }
    }

    Ok(())
}
