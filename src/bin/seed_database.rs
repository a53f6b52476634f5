//! Match Analysis Database Seeder
//!
//! Seeds a running API with a default scoring rubric and a handful of demo
//! events, and optionally uploads a local video file to the newest event.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:3000 --video ./court.mp4`
//!
//! Re-running is safe: rubric codes that already exist are skipped.

use clap::{Arg, Command};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode, multipart, redirect};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::time::Duration;

/// (code, name, points, ordering)
const DEFAULT_RUBRIC: &[(&str, &str, i32, i32)] = &[
    ("SRV", "Serve", 1, 0),
    ("ACE", "Ace", 3, 1),
    ("ATK", "Attack", 2, 2),
    ("KILL", "Kill", 3, 3),
    ("BLK", "Block", 2, 4),
    ("DIG", "Dig", 1, 5),
    ("SET", "Set", 1, 6),
    ("ERR", "Unforced error", -1, 7),
];

/// (name, date)
const DEMO_EVENTS: &[(&str, &str)] = &[
    ("Spring Invitational", "2025-04-12"),
    ("Regional Qualifiers", "2025-06-07"),
    ("Summer Beach Open", "2025-07-19"),
];

#[derive(Debug, Default)]
struct Summary {
    actions_created: usize,
    actions_skipped: usize,
    events_created: usize,
    videos_uploaded: usize,
}

struct DatabaseSeeder {
    base_url: String,
    client: Client,
    summary: Summary,
}

impl DatabaseSeeder {
    fn new(base_url: &str) -> anyhow::Result<Self> {
        // Form posts answer with 303; keep it visible instead of following
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            summary: Summary::default(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn progress_bar(len: usize) -> ProgressBar {
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }

    async fn test_connection(&self) -> anyhow::Result<()> {
        let response = self.client.get(self.url("/healthz")).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Health check returned {}", response.status());
        }
        Ok(())
    }

    async fn create_actions(&mut self) -> anyhow::Result<()> {
        println!("{} Creating scoring rubric...", style("[1/3]").bold().dim());
        let pb = Self::progress_bar(DEFAULT_RUBRIC.len());

        for &(code, name, points, ordering) in DEFAULT_RUBRIC {
            pb.set_message(code);
            let response = self
                .client
                .post(self.url("/actions"))
                .json(&json!({
                    "code": code,
                    "name": name,
                    "points": points,
                    "ordering": ordering,
                }))
                .send()
                .await?;

            match response.status() {
                StatusCode::CREATED => self.summary.actions_created += 1,
                StatusCode::CONFLICT => self.summary.actions_skipped += 1,
                status => {
                    let body = response.text().await.unwrap_or_default();
                    anyhow::bail!("Creating action {code} failed with {status}: {body}");
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        println!(
            "{} Rubric ready ({} new, {} already present)",
            style("✓").green(),
            self.summary.actions_created,
            self.summary.actions_skipped
        );
        Ok(())
    }

    async fn create_events(&mut self) -> anyhow::Result<()> {
        println!("{} Creating demo events...", style("[2/3]").bold().dim());
        let pb = Self::progress_bar(DEMO_EVENTS.len());

        for &(name, date) in DEMO_EVENTS {
            pb.set_message(name);
            let response = self
                .client
                .post(self.url("/events/new"))
                .form(&[("name", name), ("date", date)])
                .send()
                .await?;

            if response.status() != StatusCode::SEE_OTHER {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Creating event {name} failed with {status}: {body}");
            }
            self.summary.events_created += 1;
            pb.inc(1);
        }

        pb.finish_and_clear();
        println!(
            "{} Created {} events",
            style("✓").green(),
            self.summary.events_created
        );
        Ok(())
    }

    async fn upload_video(&mut self, path: Option<&PathBuf>) -> anyhow::Result<()> {
        println!("{} Uploading video...", style("[3/3]").bold().dim());
        let Some(path) = path else {
            println!("{} No --video given, skipping", style("-").yellow());
            return Ok(());
        };

        // The event list is newest first
        let events: Vec<Value> = self
            .client
            .get(self.url("/"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let Some(event_id) = events.first().and_then(|event| event["id"].as_i64()) else {
            anyhow::bail!("No event available to attach the video to");
        };

        let content = tokio::fs::read(path).await?;
        let display_name = path
            .file_name()
            .map_or_else(|| "seeded video".to_string(), |name| name.to_string_lossy().into_owned());

        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("{} ({} bytes)", display_name, content.len()));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let form = multipart::Form::new()
            .text("filename", display_name.clone())
            .part("video", multipart::Part::bytes(content).file_name(display_name));
        let response = self
            .client
            .post(self.url(&format!("/events/{event_id}/upload")))
            .multipart(form)
            .send()
            .await?;
        spinner.finish_and_clear();

        let status = response.status();
        let body: Value = response.json().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("Upload failed with {status}: {}", body["error"]);
        }

        self.summary.videos_uploaded += 1;
        println!(
            "{} Uploaded as video {} to event {}",
            style("✓").green(),
            body["video_id"],
            event_id
        );
        Ok(())
    }

    fn display_summary(&self) {
        println!();
        println!("{}", style("Seeding complete").bold().green());
        println!("{}", style("=".repeat(40)).dim());
        for (name, count) in [
            ("Actions created", self.summary.actions_created),
            ("Actions skipped", self.summary.actions_skipped),
            ("Events", self.summary.events_created),
            ("Videos", self.summary.videos_uploaded),
        ] {
            println!("{:.<24} {}", style(name).cyan(), style(count).bold());
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("Match Analysis Database Seeder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Seeds a running match analysis API with a rubric and demo events")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("video")
                .short('v')
                .long("video")
                .value_name("FILE")
                .help("Video file to upload to the newest event")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .get_matches();

    let base_url = matches
        .get_one::<String>("url")
        .map_or("http://localhost:3000", String::as_str);
    let video = matches.get_one::<PathBuf>("video");

    println!("{}", style("Match Analysis Database Seeder").bold());
    println!("{}", style("-".repeat(40)).dim());
    println!("API URL: {}", style(base_url).cyan());

    let mut seeder = DatabaseSeeder::new(base_url)?;
    seeder.test_connection().await?;
    seeder.create_actions().await?;
    seeder.create_events().await?;
    seeder.upload_video(video).await?;
    seeder.display_summary();

    Ok(())
}
