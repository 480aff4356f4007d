//! Command execution.
//!
//! Each command returns the text printed on success. Errors carry the
//! backend's message when there is one.

use std::fmt::Write as _;

use serde_json::Value;
use taskboard_application::session::evict;
use taskboard_application::{
    ApplicationError, ApplicationResult, RefreshTrigger, Reply, RetryPolicy,
};
use taskboard_domain::token::{self, token_preview};
use taskboard_domain::{ApiRequest, HttpMethod, SignInRequest, SignUpRequest};
use tracing::info;

use crate::cli::Command;
use crate::client::Client;

/// Runs `command` against `client`.
///
/// # Errors
///
/// Returns the failure of the underlying use case.
pub async fn run(client: &Client, command: Command) -> ApplicationResult<String> {
    match command {
        Command::SignIn { username, password } => {
            let pair = client
                .sign_in()
                .execute(&SignInRequest::new(username.as_str(), password))
                .await?;
            let who = token::subject_of(&pair.access_token).unwrap_or(username);
            Ok(format!("Signed in as {who}"))
        }
        Command::SignUp {
            name,
            email,
            password,
        } => {
            client
                .sign_up()
                .execute(&SignUpRequest::new(name, email.as_str(), password))
                .await?;
            Ok(format!("Account created for {email}"))
        }
        Command::Logout => {
            client.logout().execute().await;
            Ok("Signed out".to_string())
        }
        Command::Status => Ok(status(client).await),
        Command::Refresh => refresh(client).await,
        Command::Home => home(client).await,
        Command::Board => {
            let profile = client.load_profile().execute().await?;
            render(client.boards().board(profile.id).await?)
        }
        Command::Request { method, path, body } => {
            let method: HttpMethod = method.to_uppercase().parse()?;
            let mut request = ApiRequest::new(method, client.endpoints().join_path(&path));
            if let Some(body) = body {
                let value: Value = serde_json::from_str(&body)?;
                request = request.with_json(&value)?;
            }
            let reply = client
                .gateway()
                .request(&request, RetryPolicy::RefreshOnce)
                .await?;
            render(reply)
        }
    }
}

async fn status(client: &Client) -> String {
    let guard = client.guard();
    let snapshot = guard.evaluate().await;
    let mut out = String::new();

    let state = if snapshot.is_authenticated {
        "signed in"
    } else {
        "signed out"
    };
    let _ = writeln!(out, "Session: {state}");
    if let Some(subject) = guard.subject().await {
        let _ = writeln!(out, "User: {subject}");
    }
    if let Some(access_token) = &snapshot.access_token {
        let _ = writeln!(out, "Access token: {}", token_preview(access_token));
    }
    let _ = write!(out, "Status: {}", guard.status().await.display_message());
    out
}

async fn refresh(client: &Client) -> ApplicationResult<String> {
    if client
        .coordinator()
        .refresh(RefreshTrigger::Manual)
        .await
        .is_none()
    {
        let navigator = client.navigator();
        evict(client.store().as_ref(), navigator.as_ref()).await;
        return Err(ApplicationError::SignedOut);
    }
    let status = client.guard().status().await;
    Ok(format!("Access token refreshed. {}", status.display_message()))
}

async fn home(client: &Client) -> ApplicationResult<String> {
    let view = client.enter_home().execute().await?;
    info!(user_id = view.profile.id, "entered home");
    let board = if view.profile.has_board() {
        "existing board"
    } else {
        "new board"
    };
    let message = format!(
        "Welcome, {} <{}> (user {}, {board})",
        view.profile.name, view.profile.email, view.profile.id
    );
    view.keeper.deactivate().await;
    Ok(message)
}

fn render(reply: Reply) -> ApplicationResult<String> {
    match reply {
        Reply::Json(value) => Ok(serde_json::to_string_pretty(&value)?),
        Reply::Text(text) => Ok(text),
        Reply::Empty => Ok("(no content)".to_string()),
        Reply::SignedOut => Err(ApplicationError::SignedOut),
    }
}
