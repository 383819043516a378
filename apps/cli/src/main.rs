use std::{collections::BTreeMap, fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    fields, query, AdoptionApi, PaginatedCollectionController, PictureAsset, StepAdvance,
    TracingNotifier, WizardController,
};
use serde::Deserialize;
use shared::domain::{AccountKind, AnimalKind, AnimalSummary, OngSummary};

mod config;

#[derive(Parser, Debug)]
#[command(name = "adopet", about = "Browse adoptable animals and register accounts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Species {
    Dog,
    Cat,
    Other,
}

impl From<Species> for AnimalKind {
    fn from(value: Species) -> Self {
        match value {
            Species::Dog => AnimalKind::Dog,
            Species::Cat => AnimalKind::Cat,
            Species::Other => AnimalKind::Other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List adoptable animals, optionally filtered by badge and search text.
    Animals {
        #[arg(long)]
        species: Option<Species>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long, default_value_t = 10)]
        take: u32,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List registered ONGs.
    Ongs {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 10)]
        take: u32,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Register an account from a TOML form file.
    Register {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        picture: Option<PathBuf>,
    },
}

#[derive(Debug, Deserialize)]
struct RegisterFile {
    kind: String,
    fields: BTreeMap<String, String>,
}

fn field_id(name: &str) -> Option<&'static str> {
    [
        fields::FIRST_NAME,
        fields::LAST_NAME,
        fields::ORGANIZATION_NAME,
        fields::EMAIL,
        fields::PASSWORD,
        fields::CONFIRM_PASSWORD,
        fields::DATE_OF_BIRTH,
        fields::PHONE,
        fields::JOB,
        fields::CPF,
        fields::CNPJ,
        fields::DESCRIPTION,
        fields::STREET,
        fields::NUMBER,
        fields::NEIGHBORHOOD,
        fields::CITY,
        fields::STATE,
    ]
    .into_iter()
    .find(|id| *id == name)
}

async fn list_animals(
    api: &AdoptionApi,
    species: Option<Species>,
    search: &str,
    size: Option<String>,
    take: u32,
    pages: u32,
) -> Result<()> {
    let mut filter_values = BTreeMap::new();
    if let Some(size) = size {
        filter_values.insert("size".to_string(), size);
    }
    let composed = query::compose(species.map(AnimalKind::from), search, &filter_values)
        .with_take(take);
    let controller: PaginatedCollectionController<AnimalSummary> =
        PaginatedCollectionController::new(composed);

    for _ in 0..pages {
        controller.load_next(api).await?;
        if !controller.snapshot().await.has_more {
            break;
        }
    }

    for animal in controller.snapshot().await.items {
        println!(
            "#{:<5} {:<6} {:<20} {}",
            animal.id.0,
            animal.kind.as_wire(),
            animal.name.as_deref().unwrap_or("-"),
            animal.description
        );
    }
    Ok(())
}

async fn list_ongs(
    api: &AdoptionApi,
    search: &str,
    take: u32,
    pages: u32,
) -> Result<()> {
    let composed = query::compose(None, search, &BTreeMap::new()).with_take(take);
    let controller: PaginatedCollectionController<OngSummary> =
        PaginatedCollectionController::new(composed);

    for _ in 0..pages {
        controller.load_next(api).await?;
        if !controller.snapshot().await.has_more {
            break;
        }
    }

    for ong in controller.snapshot().await.items {
        println!(
            "#{:<5} {} {} <{}>",
            ong.id.0, ong.first_name, ong.last_name, ong.email
        );
    }
    Ok(())
}

async fn register(api: &AdoptionApi, form_path: PathBuf, picture: Option<PathBuf>) -> Result<()> {
    let raw = fs::read_to_string(&form_path)
        .with_context(|| format!("failed to read form file {}", form_path.display()))?;
    let file: RegisterFile = toml::from_str(&raw).context("invalid form file")?;

    let kind = match file.kind.to_ascii_lowercase().as_str() {
        "physical" | "fisical" => AccountKind::Physical,
        "organization" | "ong" => AccountKind::Organization,
        other => bail!("unknown account kind `{other}`"),
    };

    let mut wizard = WizardController::new(kind);
    for (name, value) in &file.fields {
        match field_id(name) {
            Some(id) => wizard.set_field(id, value.clone()),
            None => bail!("unknown form field `{name}`"),
        }
    }

    if let Some(path) = picture {
        let bytes = fs::read(&path)
            .with_context(|| format!("failed to read picture {}", path.display()))?;
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => Some("image/png".to_string()),
            Some("jpg") | Some("jpeg") => Some("image/jpeg".to_string()),
            _ => None,
        };
        wizard.attach_picture(PictureAsset {
            filename: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("picture")
                .to_string(),
            mime_type: mime,
            bytes: Some(bytes),
        });
    }

    let notifier = TracingNotifier;
    loop {
        match wizard.next(api, &notifier).await {
            StepAdvance::Advanced { step } => {
                println!("step ok, now on step {step}");
            }
            StepAdvance::Stayed => {
                for (field, message) in wizard.errors() {
                    eprintln!("  {field}: {message}");
                }
                bail!("registration stopped on step {}", wizard.current_step());
            }
            StepAdvance::Submitted { account } => {
                println!(
                    "account created: id={} {} {}",
                    account.id.0, account.first_name, account.last_name
                );
                return Ok(());
            }
            StepAdvance::AlreadySubmitted => return Ok(()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let config = config::load_config();
    let api = AdoptionApi::new(&config)?;

    match cli.command {
        Command::Animals {
            species,
            search,
            size,
            take,
            pages,
        } => list_animals(&api, species, &search, size, take, pages).await,
        Command::Ongs {
            search,
            take,
            pages,
        } => list_ongs(&api, &search, take, pages).await,
        Command::Register { form, picture } => register(&api, form, picture).await,
    }
}
