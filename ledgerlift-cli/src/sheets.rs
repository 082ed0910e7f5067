use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use google_sheets4::api::{
    BatchUpdateSpreadsheetRequest, CellData, CellFormat, Color, GridProperties, GridRange,
    RepeatCellRequest, Request, Sheet, SheetProperties, Spreadsheet, SpreadsheetProperties,
    TextFormat, ValueRange,
};
use google_sheets4::Sheets;
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

use ledgerlift_core::{Transaction, HEADER};

use crate::state::ensure_ledgerlift_home;

// IMPORTANT: use the oauth2 version re-exported by google-sheets4 to avoid version mismatches.
use google_sheets4::oauth2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthClient {
    pub client_id: String,
    pub client_secret: String,
    /// Defaults to https://accounts.google.com/o/oauth2/auth
    pub auth_uri: Option<String>,
    /// Defaults to https://oauth2.googleapis.com/token
    pub token_uri: Option<String>,
    /// Defaults to ["http://localhost"]
    pub redirect_uris: Option<Vec<String>>,
}

fn oauth_client_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlift_home()?.join("google_oauth.json"))
}

fn token_cache_path() -> Result<PathBuf> {
    Ok(ensure_ledgerlift_home()?.join("google_token_cache.json"))
}

pub fn save_oauth_client(client: &GoogleOAuthClient) -> Result<()> {
    let p = oauth_client_path()?;
    fs::write(&p, serde_json::to_string_pretty(client)?)
        .with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn load_oauth_client() -> Result<GoogleOAuthClient> {
    let p = oauth_client_path()?;
    if !p.exists() {
        bail!(
            "Missing Google OAuth client config at {}. Run: ledgerlift sheets connect",
            p.display()
        );
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

/// Interactive connect:
/// - user pastes client_id/client_secret from Google Cloud Console (Desktop app)
/// - we run OAuth installed-app flow
/// - tokens cached under ~/.ledgerlift/google_token_cache.json
pub async fn connect_interactive() -> Result<()> {
    println!("Google Sheets connect\n");
    println!("This uses the official Google Sheets API.\n");
    println!("You need to create OAuth credentials once:\n");
    println!("1) Go to: https://console.cloud.google.com/apis/credentials");
    println!("2) Create credentials → OAuth client ID");
    println!("3) Application type: Desktop app");
    println!("4) Copy client_id + client_secret\n");

    let client_id = prompt("Paste client_id")?;
    let client_secret = prompt("Paste client_secret")?;

    if !client_id.contains('.') || client_secret.len() < 10 {
        bail!("client_id/client_secret didn't look valid");
    }

    let client = GoogleOAuthClient {
        client_id,
        client_secret,
        auth_uri: Some("https://accounts.google.com/o/oauth2/auth".to_string()),
        token_uri: Some("https://oauth2.googleapis.com/token".to_string()),
        redirect_uris: Some(vec!["http://localhost".to_string()]),
    };

    save_oauth_client(&client)?;

    // Run OAuth flow (installed app) and cache token.
    let _hub = hub_from_client(&client).await?;

    println!("\nConnected. Tokens cached at: {}", token_cache_path()?.display());
    Ok(())
}

/// Report whether an OAuth client config and a token cache exist.
pub fn status() -> Result<()> {
    let client = oauth_client_path()?;
    let cache = token_cache_path()?;

    if client.exists() {
        println!("OAuth client config: {}", client.display());
    } else {
        println!("OAuth client config: missing (run: ledgerlift sheets connect)");
    }
    if cache.exists() {
        println!("Token cache:         {}", cache.display());
    } else {
        println!("Token cache:         missing (created on first connect/export)");
    }
    Ok(())
}

async fn hub_from_client(
    client: &GoogleOAuthClient,
) -> Result<Sheets<HttpsConnector<HttpConnector>>> {
    // yup-oauth2 expects the same structure as Google "installed" client secrets.
    let installed = oauth2::ApplicationSecret {
        client_id: client.client_id.clone(),
        client_secret: client.client_secret.clone(),
        auth_uri: client
            .auth_uri
            .clone()
            .unwrap_or_else(|| "https://accounts.google.com/o/oauth2/auth".to_string()),
        token_uri: client
            .token_uri
            .clone()
            .unwrap_or_else(|| "https://oauth2.googleapis.com/token".to_string()),
        redirect_uris: client
            .redirect_uris
            .clone()
            .unwrap_or_else(|| vec!["http://localhost".to_string()]),
        ..Default::default()
    };

    let token_path = token_cache_path()?;
    let auth = oauth2::InstalledFlowAuthenticator::builder(
        installed,
        oauth2::InstalledFlowReturnMethod::HTTPRedirect,
    )
    .persist_tokens_to_disk(token_path)
    .build()
    .await
    .context("building oauth authenticator")?;

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .https_or_http()
        .enable_http1()
        .build();
    let hub = Sheets::new(hyper::Client::builder().build(connector), auth);
    Ok(hub)
}

fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Create a spreadsheet, write header + rows, and format the header.
///
/// Returns the URL of the new spreadsheet.
pub async fn export_transactions(
    txns: &[Transaction],
    title_prefix: &str,
    tab_title: &str,
    today: NaiveDate,
) -> Result<String> {
    let client = load_oauth_client()?;
    let hub = hub_from_client(&client).await?;

    let spreadsheet = Spreadsheet {
        properties: Some(SpreadsheetProperties {
            title: Some(format!("{} - {}", title_prefix, today.format("%Y-%m-%d"))),
            ..Default::default()
        }),
        sheets: Some(vec![Sheet {
            properties: Some(SheetProperties {
                title: Some(tab_title.to_string()),
                grid_properties: Some(GridProperties {
                    row_count: Some(txns.len() as i32 + 1),
                    column_count: Some(HEADER.len() as i32),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let (_, created) = hub
        .spreadsheets()
        .create(spreadsheet)
        .doit()
        .await
        .context("creating spreadsheet")?;

    let spreadsheet_id = created
        .spreadsheet_id
        .clone()
        .context("spreadsheet id missing from create response")?;
    tracing::debug!(%spreadsheet_id, rows = txns.len(), "spreadsheet created");
    let sheet_id = created
        .sheets
        .as_ref()
        .and_then(|s| s.first())
        .and_then(|s| s.properties.as_ref())
        .and_then(|p| p.sheet_id)
        .unwrap_or(0);

    // Header + one row per transaction. RAW keeps Sheets from re-parsing
    // values; a missing balance goes up as null (empty cell).
    let mut values: Vec<Vec<serde_json::Value>> = Vec::with_capacity(txns.len() + 1);
    values.push(HEADER.iter().map(|h| json!(h)).collect());
    for t in txns {
        values.push(vec![
            json!(t.date_label()),
            json!(t.description),
            json!(t.amount),
            t.balance.map(|b| json!(b)).unwrap_or(serde_json::Value::Null),
            json!(t.kind.as_str()),
        ]);
    }

    let range = format!("A1:E{}", values.len());
    let value_range = ValueRange {
        range: Some(range.clone()),
        values: Some(values),
        ..Default::default()
    };

    hub.spreadsheets()
        .values_update(value_range, &spreadsheet_id, &range)
        .value_input_option("RAW")
        .doit()
        .await
        .context("writing transaction rows")?;

    // Bold white-on-blue header row.
    let header_format = RepeatCellRequest {
        range: Some(GridRange {
            sheet_id: Some(sheet_id),
            start_row_index: Some(0),
            end_row_index: Some(1),
            ..Default::default()
        }),
        cell: Some(CellData {
            user_entered_format: Some(CellFormat {
                background_color: Some(Color {
                    red: Some(0.2),
                    green: Some(0.5),
                    blue: Some(0.8),
                    ..Default::default()
                }),
                text_format: Some(TextFormat {
                    foreground_color: Some(Color {
                        red: Some(1.0),
                        green: Some(1.0),
                        blue: Some(1.0),
                        ..Default::default()
                    }),
                    bold: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        fields: "userEnteredFormat(backgroundColor,textFormat)".parse().ok(),
    };

    let batch = BatchUpdateSpreadsheetRequest {
        requests: Some(vec![Request {
            repeat_cell: Some(header_format),
            ..Default::default()
        }]),
        ..Default::default()
    };

    hub.spreadsheets()
        .batch_update(batch, &spreadsheet_id)
        .doit()
        .await
        .context("formatting header row")?;

    Ok(format!(
        "https://docs.google.com/spreadsheets/d/{spreadsheet_id}"
    ))
}
