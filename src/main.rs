use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use richtext_render::batch::{find_document, Batch};
use richtext_render::config::{Cmd, Config, Flags, PathValidity};
use richtext_render::{Renderer, RichText};
use std::path::Path;
use std::sync::Arc;
use structopt::StructOpt;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);
    let filter_layer = EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

fn print(rich: &RichText, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(rich)?);
    } else {
        println!("{}", rich.html);
    }
    Ok(())
}

#[instrument(skip(renderer))]
async fn render_file(renderer: &Renderer, file: Option<&Path>) -> Result<RichText> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .wrap_err("Could not read document")?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .wrap_err("Could not read stdin")?;
            buf
        }
    };
    Ok(renderer.render(text))
}

async fn resolve(cfg: &Config, renderer: &Renderer, path: &str) -> Result<RichText> {
    match cfg.batch.folder.check_name(path, cfg.batch.root()) {
        PathValidity::Invalid => Err(eyre!("Invalid path {:?}", path)),
        PathValidity::Folder(loc) => Err(eyre!("{:?} is the folder {:?}", path, loc.source)),
        PathValidity::File(loc, name) => {
            let file = find_document(&loc.source, name)
                .await
                .ok_or_else(|| eyre!("No document {:?} in {:?}", name, loc.source))?;
            info!("Resolved {:?} to {:?}", path, file);
            render_file(renderer, Some(&file)).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var(
            "RUST_LOG",
            #[cfg(debug_assertions)]
            "warn,richtext_render=trace",
            #[cfg(not(debug_assertions))]
            "warn,richtext_render=info",
        );
    }
    install_tracing();
    color_eyre::install()?;

    let flags = Flags::from_args();
    let cfg = flags.load_cfg().await?;
    let renderer = Renderer::new(cfg.render.clone());

    match &flags.cmd {
        Cmd::Render { file, json, .. } => {
            let rich = render_file(&renderer, file.as_deref()).await?;
            print(&rich, *json)?;
        }
        Cmd::Resolve { path, json, .. } => {
            let rich = resolve(&cfg, &renderer, path).await?;
            print(&rich, *json)?;
        }
        Cmd::Batch => {
            let batch = Batch::new(Arc::new(renderer), cfg.batch.concurrency);
            let jobs = batch
                .collect_jobs(&cfg.batch.folder, cfg.batch.root())
                .await
                .wrap_err("Could not collect documents")?;
            let report = batch.run(jobs).await;
            if report.failed > 0 {
                return Err(eyre!("{} documents failed to render", report.failed));
            }
        }
    }
    Ok(())
}
