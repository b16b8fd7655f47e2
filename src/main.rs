use anyhow::Context;
use clap::Parser;
use picviewer::{cli, config, editor, error, scanner, server, Gallery, SaveOutcome};
use picviewer_common::{available_tags, file_name_of, filter_images, ImageQuery, ImageRecord};
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(dir) = cli.pics_dir.clone() {
        config.pics_dir = dir;
    }
    if cli.server.is_some() {
        config.set_server_url(cli.server.clone());
    }

    match cli.command {
        Commands::Scan => {
            let files = scanner::scan_directory(&config.pics_dir);
            let json = serde_json::to_string_pretty(&picviewer_common::ScanResponse::ok(files))?;
            println!("{}", json);
        }

        Commands::List { search, tag, json } => {
            let mut gallery = Gallery::from_config(&config)?;
            let images = gallery.load().await;

            let query = ImageQuery::new(search, tag);
            let filtered = filter_images(&images, &query);

            if json {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
            } else {
                for image in &filtered {
                    print_record(image);
                }
                println!("\n{} / {} 件の画像", filtered.len(), images.len());
            }
        }

        Commands::Tags => {
            let mut gallery = Gallery::from_config(&config)?;
            let images = gallery.load().await;
            let tags = available_tags(&images);

            if tags.is_empty() {
                println!("タグはまだありません");
            }
            for tag in tags {
                let count = images.iter().filter(|i| i.has_tag(&tag)).count();
                println!("{} ({})", tag, count);
            }
        }

        Commands::Show { image } => {
            let mut gallery = Gallery::from_config(&config)?;
            let images = gallery.load().await;
            let record = find_image(&images, &image)?;
            print_record(record);
        }

        Commands::Edit { image, tag, clear_tags, source_url } => {
            let mut gallery = Gallery::from_config(&config)?;
            let images = gallery.load().await;
            let record = find_image(&images, &image)?.clone();

            let outcome = if tag.is_empty() && !clear_tags && source_url.is_none() {
                let (tags, url) = editor::run_interactive_edit(&record)?;
                gallery.save(&record.path, tags, url).await
            } else {
                let mut outcome = None;
                if !tag.is_empty() || clear_tags {
                    outcome = Some(gallery.save_tags(&record.path, tag).await);
                }
                if let Some(url) = source_url {
                    outcome = Some(gallery.save_source_url(&record.path, &url).await);
                }
                outcome.unwrap_or(SaveOutcome::Failed)
            };

            match outcome {
                SaveOutcome::Saved(backend) => {
                    println!("✔ 保存しました: {} → {}", record.name, backend);
                    println!(
                        "  タグ: {}",
                        editor::format_tags(&gallery.tags_for(&record.path))
                    );
                    if let Some(url) = gallery.source_url_for(&record.path) {
                        println!("  入手元: {}", url);
                    }
                }
                SaveOutcome::Failed => {
                    println!("⚠ メタデータの保存に失敗しました（詳細は --verbose）");
                }
            }
        }

        Commands::Serve { port, public_dir } => {
            let public_dir = public_dir.unwrap_or_else(|| config.public_dir.clone());
            let port = port.unwrap_or(config.port);
            let state = server::AppState::new(config.pics_dir.clone(), public_dir);
            server::serve(state, port)
                .await
                .with_context(|| format!("開発サーバーの起動に失敗 (port {})", port))?;
        }

        Commands::Generate { public_dir } => {
            let public_dir = public_dir.unwrap_or_else(|| config.public_dir.clone());
            let path = scanner::write_scan_listing(&public_dir, &config.pics_dir)?;
            println!("✔ 一覧ファイルを生成: {}", path.display());
        }

        Commands::Config { set_server_url, set_pics_dir, show } => {
            // グローバルオプションの上書きを保存しないよう読み直す
            let mut config = Config::load()?;
            let mut changed = false;

            if let Some(url) = set_server_url {
                config.set_server_url(Some(url));
                changed = true;
            }
            if let Some(dir) = set_pics_dir {
                config.pics_dir = dir;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let gallery = Gallery::from_config(&config)?;
                println!("設定:");
                println!("  画像フォルダ: {}", config.pics_dir.display());
                println!("  公開ディレクトリ: {}", config.public_dir.display());
                println!("  ポート: {}", config.port);
                println!(
                    "  サーバーURL: {}",
                    config.server_url.as_deref().unwrap_or("未設定")
                );
                println!("  キャッシュ: {}", config.resolved_cache_path()?.display());
                for (i, backend) in gallery.storage().backends().iter().enumerate() {
                    println!("  保存先{}: {}", i + 1, backend);
                }
                for (i, source) in gallery.listing().sources().iter().enumerate() {
                    println!("  一覧取得元{}: {}", i + 1, source);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn find_image<'a>(images: &'a [ImageRecord], image: &str) -> error::Result<&'a ImageRecord> {
    let name = file_name_of(image);
    images
        .iter()
        .find(|i| i.name == name)
        .ok_or_else(|| error::PicViewerError::ImageNotFound(image.to_string()))
}

fn print_record(image: &ImageRecord) {
    println!("{} ({} bytes)", image.name, image.size);
    println!("  タグ: {}", editor::format_tags(&image.tags));
    if let Some(url) = &image.source_url {
        println!("  入手元: {}", url);
    }
}
