use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::rolling;

use hrm_portal::api::accounts::{LOGIN_REJECTED, RESET_REJECTED};
use hrm_portal::api::leave_request::{
    ADMIN_REQUIRED, APPROVE_REJECTED, LEAVE_REQUEST_REJECTED, REJECT_REJECTED,
};
use hrm_portal::api::permission::PERMISSION_REJECTED;
use hrm_portal::attendance::{ActionOutcome, AttendanceController, CheckInCutoff};
use hrm_portal::auth::password::PasswordResetReq;
use hrm_portal::auth::session::{Session, SessionFile};
use hrm_portal::config::Config;
use hrm_portal::console::{self, TerminalPrompt};
use hrm_portal::error::PortalError;
use hrm_portal::geo::{ConfiguredLocation, Coordinates, LocationOptions};
use hrm_portal::model::attendance::{HistorySummary, Month};
use hrm_portal::model::leave_request::{CreateLeave, LeaveFilter, LeaveId, VisibleLeaveKinds};
use hrm_portal::model::permission::PermissionForm;
use hrm_portal::ApiClient;

#[derive(Parser)]
#[command(name = "hrm")]
#[command(about = "Employee self-service: attendance, permissions and leave")]
struct Cli {
    /// Overrides API_BASE_URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Current latitude for check-in / check-out
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,
    /// Current longitude for check-in / check-out
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,
    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    yes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(long)]
        employee_id: String,
        #[arg(long, env = "HRM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    ResetPassword {
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        current_password: String,
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    Whoami,
    Attendance {
        #[command(subcommand)]
        command: AttendanceCommand,
    },
    Permission {
        #[command(subcommand)]
        command: PermissionCommand,
    },
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
}

#[derive(Subcommand)]
enum AttendanceCommand {
    Today,
    CheckIn,
    CheckOut,
    History {
        /// YYYY-MM, defaults to the current month
        #[arg(long)]
        month: Option<Month>,
    },
}

#[derive(Subcommand)]
enum PermissionCommand {
    Create {
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        reason: String,
    },
    List,
}

#[derive(Subcommand)]
enum LeaveCommand {
    Types,
    Balance,
    Request {
        /// Leave type id, see `leave types`
        #[arg(long = "type")]
        leave_type: u64,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        reason: String,
    },
    Mine {
        /// all, pending, approved or rejected
        #[arg(long, default_value = "all")]
        status: LeaveFilter,
    },
    Pending,
    Approve {
        id: u64,
    },
    Reject {
        id: u64,
        #[arg(long)]
        reason: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        api_url,
        lat,
        lon,
        yes,
        command,
    } = Cli::parse();
    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(url) = api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(api = %config.api_base_url, "hrm starting");

    let client = ApiClient::new(config.api_base_url.clone())?
        .with_leave_kinds(VisibleLeaveKinds::new(config.visible_leave_types.clone()))
        .with_leave_type_ttl(config.leave_type_cache_ttl);
    let sessions = SessionFile::new(config.session_file.clone());

    match command {
        Commands::Login {
            employee_id,
            password,
        } => {
            let session = client
                .login(&employee_id, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(LOGIN_REJECTED)))?;
            sessions.save(&session).await?;
            let name = session
                .user
                .as_ref()
                .and_then(|u| u.name.clone())
                .unwrap_or(employee_id);
            println!("Logged in as {name}");
        }
        Commands::Logout => {
            match sessions.load().await {
                Ok(session) => {
                    // local logout happens regardless of what the server says
                    if let Err(e) = client.logout(&session).await {
                        warn!(error = %e, "Logout call failed");
                    }
                }
                Err(PortalError::NotAuthenticated) => {}
                Err(e) => warn!(error = %e, "Could not read session"),
            }
            sessions.clear().await?;
            println!("Logged out");
        }
        Commands::ResetPassword {
            employee_id,
            current_password,
            new_password,
            confirm_password,
        } => {
            let req = PasswordResetReq {
                employee_id,
                current_password,
                new_password,
                confirm_password,
            };
            let msg = client
                .reset_password(&req)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(RESET_REJECTED)))?;
            println!("{msg}");
        }
        Commands::Whoami => {
            let session = require_session(&sessions).await?;
            let me = client.me(&session).await.map_err(|e| {
                anyhow::anyhow!(e.user_message("Employee details not found. Please login again."))
            })?;
            println!("{} ({})", me.display_name(), me.employee_id.as_deref().unwrap_or("—"));
            println!("{}", me.display_email());
        }
        Commands::Attendance { command } => {
            let session = require_session(&sessions).await?;
            let here = lat.zip(lon);
            let prompt = TerminalPrompt { assume_yes: yes };
            run_attendance(&config, client, session, command, here, prompt).await?;
        }
        Commands::Permission { command } => {
            let session = require_session(&sessions).await?;
            match command {
                PermissionCommand::Create { start, end, reason } => {
                    let form = PermissionForm {
                        start_time: start,
                        end_time: end,
                        reason,
                    };
                    client
                        .create_permission(&session, form)
                        .await
                        .map_err(|e| anyhow::anyhow!(e.user_message(PERMISSION_REJECTED)))?;
                    println!("Permission request submitted.");
                }
                PermissionCommand::List => {
                    let items = client
                        .list_permissions(&session)
                        .await
                        .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load permissions.")))?;
                    print!("{}", console::render_permissions(&items));
                }
            }
        }
        Commands::Leave { command } => {
            let session = require_session(&sessions).await?;
            run_leave(&client, &session, command).await?;
        }
    }

    Ok(())
}

async fn require_session(sessions: &SessionFile) -> Result<Session> {
    match sessions.load().await {
        Ok(session) => Ok(session),
        Err(PortalError::NotAuthenticated) => bail!("Please login first."),
        Err(e) => Err(e).with_context(|| format!("reading {}", sessions.path().display())),
    }
}

async fn run_attendance(
    config: &Config,
    client: ApiClient,
    session: Session,
    command: AttendanceCommand,
    here: Option<(f64, f64)>,
    prompt: TerminalPrompt,
) -> Result<()> {
    if let AttendanceCommand::History { month } = command {
        let month = month.unwrap_or_else(|| Month::of(chrono::Local::now().date_naive()));
        match client.attendance_history(&session, month).await {
            Ok(entries) => {
                let summary = HistorySummary::from_entries(&entries);
                print!("{}", console::render_history(&entries, &summary));
            }
            Err(e) => {
                warn!(error = %e, %month, "History fetch failed");
                print!(
                    "{}",
                    console::render_history(&[], &HistorySummary::default())
                );
                println!("No records found for this month.");
            }
        }
        return Ok(());
    }

    let coordinates = match here {
        Some((lat, lon)) => Some(Coordinates::new(lat, lon).map_err(anyhow::Error::msg)?),
        None => config.default_location,
    };
    let options = LocationOptions {
        timeout: config.geo_timeout,
        ..LocationOptions::default()
    };
    let mut controller =
        AttendanceController::new(client, ConfiguredLocation::new(coordinates), session)
            .with_cutoff(CheckInCutoff::new(config.checkin_cutoff))
            .with_location_options(options);

    controller.load_today().await;

    let outcome = match command {
        AttendanceCommand::Today | AttendanceCommand::History { .. } => None,
        AttendanceCommand::CheckIn => {
            if !controller.can_check_in() {
                bail!("Check-in not available: {}", controller.status().message);
            }
            Some(controller.request_check_in(&prompt).await)
        }
        AttendanceCommand::CheckOut => {
            if !controller.can_check_out() {
                bail!("Check-out not available: {}", controller.status().message);
            }
            Some(controller.request_check_out(&prompt).await)
        }
    };

    match outcome {
        Some(ActionOutcome::Submitted(_)) => {
            controller.load_today().await;
        }
        Some(ActionOutcome::Failed { message }) => bail!(message),
        Some(ActionOutcome::CheckInClosed { .. }) | Some(ActionOutcome::Cancelled) => {}
        None => {}
    }

    print!(
        "{}",
        console::render_today(controller.status(), controller.employee())
    );
    Ok(())
}

async fn run_leave(client: &ApiClient, session: &Session, command: LeaveCommand) -> Result<()> {
    match command {
        LeaveCommand::Types => {
            let types = client
                .leave_types(session)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load leave types")))?;
            print!("{}", console::render_leave_types(&types));
        }
        LeaveCommand::Balance => {
            let overview = client
                .leave_overview(session)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load leave balance")))?;
            print!("{}", console::render_balance(&overview.balance));
        }
        LeaveCommand::Request {
            leave_type,
            start,
            end,
            reason,
        } => {
            let form = CreateLeave {
                leave_type,
                start_date: start,
                end_date: end,
                reason,
            };
            client
                .request_leave(session, &form)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(LEAVE_REQUEST_REJECTED)))?;
            println!("Leave request submitted successfully!");
            if let Ok(balance) = client.leave_balance(session).await {
                print!("{}", console::render_balance(&balance));
            }
        }
        LeaveCommand::Mine { status } => {
            let leaves = client
                .my_leaves(session, status)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Failed to load leave requests")))?;
            print!("{}", console::render_leaves(&leaves, 50));
        }
        LeaveCommand::Pending => {
            let leaves = client
                .pending_leaves(session)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(ADMIN_REQUIRED)))?;
            print!("{}", console::render_leaves(&leaves, 80));
        }
        LeaveCommand::Approve { id } => {
            client
                .approve_leave(session, LeaveId(id))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(APPROVE_REJECTED)))?;
            println!("Leave request approved successfully!");
        }
        LeaveCommand::Reject { id, reason } => {
            client
                .reject_leave(session, LeaveId(id), &reason)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(REJECT_REJECTED)))?;
            println!("Leave request rejected");
        }
    }
    Ok(())
}
