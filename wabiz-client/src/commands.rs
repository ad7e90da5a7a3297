use anyhow::{Context as _, Result};
use shared_types::{ContactRecord, LoginRequest};
use std::future::Future;
use std::path::{Path, PathBuf};

use importers::contact_csv;
use wabiz_client::config::{ApiSettings, ClientConfig};
use wabiz_client::session::mask_token;
use wabiz_client::{ApiClient, ApiError, Session, SessionStore};

pub struct Context {
    config: ClientConfig,
    config_path: PathBuf,
    api: ApiSettings,
    client: ApiClient,
    store: SessionStore,
    session: Session,
}

impl Context {
    pub fn load(api_url: Option<String>) -> Result<Self> {
        let (config, config_path) = ClientConfig::load().context("Failed to load config")?;

        let mut api = config.api();
        if let Some(api_url) = api_url {
            api.base_url = api_url;
        }

        let client = ApiClient::from_settings(&api)?;
        let store = SessionStore::new(config.session_path());
        let session = store
            .load()
            .with_context(|| format!("Failed to load session from {}", store.path().display()))?;

        tracing::debug!("Using API at {}", client.base_url());

        Ok(Self {
            config,
            config_path,
            api,
            client,
            store,
            session,
        })
    }

    fn save_session(&self) -> Result<()> {
        self.store
            .save(&self.session)
            .with_context(|| format!("Failed to save session to {}", self.store.path().display()))
    }

    /// Runs an authenticated call with one token refresh on `Unauthorized`,
    /// saving the session whenever the refresh replaced its tokens.
    async fn with_refresh<T, F, Fut>(&mut self, call: F) -> Result<T>
    where
        F: Fn(ApiClient, Session) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let access_token = self.session.access_token.clone();
        let result = self.client.with_refresh(&mut self.session, call).await;

        if self.session.access_token != access_token {
            self.save_session()?;
        }

        match result {
            Err(ApiError::Unauthorized(message)) => {
                Err(anyhow::anyhow!("{message}").context("Session expired, please log in again"))
            }
            other => Ok(other?),
        }
    }
}

fn read_contacts(file: &Path) -> Result<Vec<ContactRecord>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    Ok(contact_csv::decode(&text)?)
}

pub fn preview(file: &Path, json: bool) -> Result<()> {
    let contacts = read_contacts(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!("0 valid contacts found");
        return Ok(());
    }

    println!("{:<18} {:<24} {:<32} {}", "PHONE", "NAME", "EMAIL", "TAGS");
    for contact in &contacts {
        println!(
            "{:<18} {:<24} {:<32} {}",
            contact.phone,
            contact.name.as_deref().unwrap_or(""),
            contact.email.as_deref().unwrap_or(""),
            contact.tags.join(", ")
        );
    }
    println!("\n{} contacts ready to import", contacts.len());

    Ok(())
}

pub fn sample(output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(contact_csv::SAMPLE_FILE_NAME));

    std::fs::write(&output, contact_csv::sample_csv()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Sample written to {}", output.display());
    Ok(())
}

pub async fn login(ctx: &mut Context, email: String, password: String) -> Result<()> {
    let response = ctx
        .client
        .login(&LoginRequest { email, password })
        .await
        .context("Login failed")?;

    ctx.session
        .set_auth(response.user, response.access_token, response.refresh_token);
    if let Some(company_id) = ctx.session.select_default_company() {
        tracing::info!("Selected company {}", company_id);
    }
    ctx.save_session()?;

    if let Some(user) = &ctx.session.user {
        println!("Logged in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.session.logout();
    ctx.store.clear()?;
    println!("Logged out");
    Ok(())
}

pub fn status(ctx: &Context) -> Result<()> {
    let Some(user) = &ctx.session.user else {
        println!("Not logged in");
        return Ok(());
    };

    println!("User:    {} <{}>", user.name, user.email);
    if user.is_super_admin.unwrap_or(false) {
        println!("Role:    super admin");
    }
    println!(
        "Company: {}",
        ctx.session.current_company.as_deref().unwrap_or("(none)")
    );
    if let Some(token) = &ctx.session.access_token {
        println!("Token:   {}", mask_token(token));
    }
    Ok(())
}

pub async fn companies(ctx: &mut Context) -> Result<()> {
    let companies = ctx
        .with_refresh(|api, session| async move { api.list_companies(&session).await })
        .await?;

    let current = ctx.session.current_company.as_deref();
    for company in &companies {
        let marker = if Some(company.id.as_str()) == current { "*" } else { " " };
        let whatsapp = if company.whatsapp_connected {
            "connected"
        } else {
            "not connected"
        };
        println!(
            "{} {:<28} {:<24} WhatsApp {}",
            marker, company.id, company.name, whatsapp
        );
    }
    Ok(())
}

pub fn use_company(ctx: &mut Context, id: String) -> Result<()> {
    ctx.session.require_token()?;

    let known = ctx
        .session
        .user
        .as_ref()
        .and_then(|u| u.companies.as_ref())
        .map(|companies| companies.iter().any(|c| c.id == id));
    if known == Some(false) {
        tracing::warn!("Company {} is not in the user's membership list", id);
    }

    ctx.session.set_current_company(id.clone());
    ctx.save_session()?;
    println!("Using company {}", id);
    Ok(())
}

pub async fn import(ctx: &mut Context, file: &Path) -> Result<()> {
    let contacts = read_contacts(file)?;
    println!("{} valid contacts found", contacts.len());

    let response = ctx
        .with_refresh(|api, session| {
            let contacts = contacts.clone();
            async move { api.import_contacts(&session, contacts).await }
        })
        .await?;

    match response.summary {
        Some(summary) => println!(
            "Processed {}, created {}, updated {}, skipped {}",
            summary.processed, summary.created, summary.updated, summary.skipped
        ),
        None => println!("Import submitted"),
    }
    Ok(())
}

pub fn show_config(ctx: &Context) -> Result<()> {
    println!("# {}", ctx.config_path.display());
    println!("{}", toml::to_string_pretty(&ctx.config)?);
    println!("# effective");
    println!("{}", toml::to_string_pretty(&ctx.api)?);
    println!("session file = {}", ctx.store.path().display());
    Ok(())
}
