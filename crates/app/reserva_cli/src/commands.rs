use std::io::BufRead;

use log::{debug, info};
use reserva_core::client::{ApiClient, ApiError};
use reserva_core::config::ClientConfig;
use reserva_core::forms::{self, RegisterForm, ReservationForm, SpaceForm};
use reserva_core::messages;
use reserva_core::models::{Reservation, Space};
use reserva_core::shell::{Screen, Shell};

use crate::cli::{Cli, Commands, ReservationsCommand, SpaceArgs, SpaceUpdateArgs, SpacesCommand};
use crate::{Error, Result};

pub async fn dispatch(args: Cli) -> Result<()> {
    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &args.backend_url {
        config = config.with_backend_url(url)?;
    }
    if let Some(path) = args.store {
        config.store_path = path;
    }
    debug!(
        "backend {} store {}",
        config.backend_url,
        config.store_path.display()
    );

    let client = ApiClient::from_config(config).map_err(failed(messages::UNKNOWN_ERROR))?;
    let mut shell = Shell::boot(client);

    match args.command {
        Commands::Login { username, password } => login(&mut shell, &username, password).await,
        Commands::Register {
            username,
            document,
            password,
            confirm_password,
        } => {
            let form = RegisterForm {
                username,
                document,
                password,
                confirm_password,
            };
            register(&shell, &form).await
        }
        Commands::Logout => {
            shell.logout()?;
            info!("{}", messages::LOGGED_OUT);
            Ok(())
        }
        Commands::Status => {
            status(&shell);
            Ok(())
        }
        Commands::Spaces(cmd) => spaces(&shell, cmd).await,
        Commands::Reservations(cmd) => reservations(&shell, cmd).await,
        Commands::Version => Ok(()),
    }
}

/// Map a failed backend call to the action's user-facing message.
/// Form errors keep their own message.
fn failed(message: &'static str) -> impl FnOnce(ApiError) -> Error {
    move |e| match e {
        ApiError::Form(f) => Error::Form(f),
        other => Error::Api(message, other),
    }
}

fn confirm(yes: bool) -> Result<()> {
    if yes {
        Ok(())
    } else {
        Err(Error::Custom(messages::CONFIRMATION_REQUIRED.to_string()))
    }
}

// =============================================================================
// Session
// =============================================================================

async fn login(shell: &mut Shell, username: &str, password: Option<String>) -> Result<()> {
    shell.enter(Screen::Login)?;
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let email = forms::email_for(username, &shell.client().config().email_domain);

    shell.login(&email, &password).await.map_err(|e| {
        debug!("login failed: {e}");
        Error::Login(e)
    })?;

    info!("{}", messages::WELCOME);
    print_screens(shell);
    Ok(())
}

fn read_password() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(Error::Custom("Se requiere una contraseña".into()));
    }
    Ok(password)
}

async fn register(shell: &Shell, form: &RegisterForm) -> Result<()> {
    shell.enter(Screen::Register)?;
    let request = form.validate(&shell.client().config().email_domain)?;
    shell.client().register(&request).await.map_err(|e| {
        debug!("registration failed: {}", e.0);
        Error::Register(e)
    })?;
    info!("{}", messages::REGISTER_SUCCEEDED);
    Ok(())
}

fn status(shell: &Shell) {
    let session = shell.client().session();
    match session.claims().filter(|_| shell.is_logged_in()) {
        Some(claims) => {
            println!("Sesión activa");
            if let Some(sub) = &claims.sub {
                println!("  usuario: {sub}");
            }
            if let Some(id) = claims.user_id() {
                println!("  id: {id}");
            }
            if let Some(role) = claims.role() {
                println!("  rol: {role}");
            }
            if let Some(expires) = claims
                .exp
                .and_then(|exp| chrono::DateTime::from_timestamp(exp as i64, 0))
            {
                println!("  expira: {}", expires.to_rfc3339());
            }
        }
        None => println!("{}", messages::NOT_LOGGED_IN),
    }
    print_screens(shell);
}

fn print_screens(shell: &Shell) {
    let names: Vec<&str> = shell.screens().iter().map(Screen::name).collect();
    println!("Pantallas: {}", names.join(", "));
}

// =============================================================================
// Spaces
// =============================================================================

async fn spaces(shell: &Shell, cmd: SpacesCommand) -> Result<()> {
    let client = shell.client();
    match cmd {
        SpacesCommand::List => {
            shell.enter(Screen::Spaces)?;
            let all = client
                .list_spaces()
                .await
                .map_err(failed(messages::SPACES_LOAD_FAILED))?;
            for space in forms::visible_spaces(all, shell.is_admin()) {
                print_space(&space);
            }
            Ok(())
        }
        SpacesCommand::Create(args) => {
            shell.enter(Screen::CreateSpace)?;
            let form = space_form(args);
            client
                .create_space(&form)
                .await
                .map_err(failed(messages::SPACE_CREATE_FAILED))?;
            info!("{}", messages::SPACE_CREATED);
            Ok(())
        }
        SpacesCommand::Update { id, fields } => {
            shell.require_admin(Screen::Spaces)?;
            let current = client
                .list_spaces()
                .await
                .map_err(failed(messages::SPACES_LOAD_FAILED))?
                .into_iter()
                .find(|s| s.id == id)
                .ok_or_else(|| Error::Custom(format!("No existe el espacio {id}")))?;
            let updated = apply_update(&current, fields)?;
            client
                .update_space(&updated)
                .await
                .map_err(failed(messages::SPACE_UPDATE_FAILED))?;
            info!("{}", messages::SPACE_UPDATED);
            Ok(())
        }
        SpacesCommand::Delete { id, yes } => {
            shell.require_admin(Screen::Spaces)?;
            confirm(yes)?;
            client
                .delete_space(id)
                .await
                .map_err(failed(messages::SPACE_DELETE_FAILED))?;
            info!("{}", messages::SPACE_DELETED);
            Ok(())
        }
    }
}

fn space_form(args: SpaceArgs) -> SpaceForm {
    let mut form = SpaceForm::new(
        args.name,
        args.description,
        &args.capacity,
        args.location,
        args.sport,
    );
    form.active = !args.inactive;
    form
}

fn apply_update(current: &Space, fields: SpaceUpdateArgs) -> Result<Space> {
    let mut form = SpaceForm::from_space(current);
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(description) = fields.description {
        form.description = description;
    }
    if let Some(capacity) = fields.capacity {
        form.set_capacity(&capacity);
    }
    if let Some(location) = fields.location {
        form.location = location;
    }
    if let Some(sport) = fields.sport {
        form.sport = sport;
    }
    if let Some(active) = fields.active {
        form.active = active;
    }
    Ok(form.apply_to(current)?)
}

fn print_space(space: &Space) {
    println!("#{} {} [{}]", space.id, space.name, space.status_label());
    println!("    {}", space.description);
    println!(
        "    {} · {} · Capacidad: {}",
        space.sport, space.location, space.capacity
    );
}

// =============================================================================
// Reservations
// =============================================================================

async fn reservations(shell: &Shell, cmd: ReservationsCommand) -> Result<()> {
    let client = shell.client();
    match cmd {
        ReservationsCommand::List => {
            shell.enter(Screen::Reservations)?;
            let list = client
                .my_reservations()
                .await
                .map_err(failed(messages::RESERVATIONS_LOAD_FAILED))?;
            if list.is_empty() {
                info!("{}", messages::NO_RESERVATIONS);
            }
            for reservation in &list {
                print_reservation(reservation);
            }
            Ok(())
        }
        ReservationsCommand::Create {
            space,
            date,
            start,
            end,
        } => {
            shell.enter(Screen::CreateReservation)?;
            let form = ReservationForm {
                space_id: Some(space),
                date,
                start,
                end,
            };
            client
                .create_reservation(&form)
                .await
                .map_err(failed(messages::RESERVATION_CREATE_FAILED))?;
            info!("{}", messages::RESERVATION_CREATED);
            Ok(())
        }
        ReservationsCommand::Cancel { id, yes } => {
            shell.enter(Screen::Reservations)?;
            confirm(yes)?;
            client
                .cancel_my_reservation(id)
                .await
                .map_err(failed(messages::RESERVATION_CANCEL_FAILED))?;
            info!("{}", messages::RESERVATION_CANCELLED);
            Ok(())
        }
    }
}

fn print_reservation(reservation: &Reservation) {
    println!(
        "Reserva #{} [{}] {} · {} · {}",
        reservation.id,
        reservation.status,
        reservation.space_name,
        reservation.date.format("%d/%m/%Y"),
        reservation.time_range()
    );
}
