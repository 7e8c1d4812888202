#![cfg(not(tarpaulin_include))]

use fotosys::config::AppConfig;
use fotosys::controller::{PageController, Screen};
use fotosys::export;
use fotosys::loader::{self, DataLoader, SOURCE_SOLICITACOES};
use fotosys::query::{Criterion, SortDirection};
use std::env;
use std::io::{self, Write};

fn print_table(ctrl: &PageController) {
    let view = ctrl.view();
    println!(
        "page {}/{} ({} records)",
        view.page, view.total_pages, view.total_records
    );
    for record in &view.records {
        println!(
            "  {:<10} {:<12} {:<25} {:<18} {}",
            record.id().unwrap_or("-"),
            record.raw_status().unwrap_or("-"),
            record.get("Cliente").unwrap_or("-"),
            record.photographer().unwrap_or("-"),
            record.schedule_date().unwrap_or("-"),
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("config.json");
    let config = AppConfig::load(config_path)?;
    let page_size = config.ui.items_per_page;

    let data_loader = DataLoader::new(config);
    let mut ctrl = PageController::new(Screen::Pending, page_size);
    let mut status = String::from("ok");

    loop {
        print!("({status}) > ");
        io::stdout().flush().unwrap();

        let mut command = String::new();
        if io::stdin().read_line(&mut command).is_err() {
            break;
        }
        let command = command.trim();

        if command.is_empty() {
            status = String::from("invalid command");
            continue;
        }

        if command == "help" {
            println!("Commands:");
            println!("  q: Quit");
            println!("  screen <slug>: Switch screen (intake/pending/scheduled/conference/completed/billing)");
            println!("  load: Fetch the record set for the current screen");
            println!("  show: Print the current page");
            println!("  filter <field> <text>: Substring filter on a field");
            println!("  clear: Drop user filters");
            println!("  sort <field> [asc|desc]: Sort by a field");
            println!("  page <n>: Jump to a page");
            println!("  stats: Totals by status");
            println!("  export <file.csv>: Export the loaded set");
            continue;
        }

        if command == "q" {
            break;
        } else if let Some(slug) = command.strip_prefix("screen ") {
            match Screen::from_slug(slug.trim()) {
                Some(screen) => {
                    ctrl = PageController::new(screen, page_size);
                    status = String::from("ok");
                }
                None => status = String::from("unknown screen"),
            }
        } else if command == "load" {
            match data_loader.load(SOURCE_SOLICITACOES).await {
                Ok(records) => {
                    status = format!("{} records", records.len());
                    ctrl.set_records(records);
                }
                Err(e) => status = format!("load failed: {e}"),
            }
        } else if command == "show" {
            print_table(&ctrl);
            status = String::from("ok");
        } else if let Some(rest) = command.strip_prefix("filter ") {
            match rest.split_once(' ') {
                Some((field, text)) => {
                    ctrl.set_criterion(field, Criterion::Contains(text.trim().to_string()));
                    status = String::from("ok");
                }
                None => status = String::from("usage: filter <field> <text>"),
            }
        } else if command == "clear" {
            ctrl.clear_criteria();
            status = String::from("ok");
        } else if let Some(rest) = command.strip_prefix("sort ") {
            let mut parts = rest.split_whitespace();
            match parts.next() {
                Some(field) => {
                    let dir = parts
                        .next()
                        .and_then(SortDirection::parse)
                        .unwrap_or(SortDirection::Asc);
                    ctrl.set_sort(field, dir);
                    status = String::from("ok");
                }
                None => status = String::from("usage: sort <field> [asc|desc]"),
            }
        } else if let Some(n) = command.strip_prefix("page ") {
            match n.trim().parse::<usize>() {
                Ok(page) => {
                    ctrl.set_page(page);
                    status = String::from("ok");
                }
                Err(_) => status = String::from("invalid page"),
            }
        } else if command == "stats" {
            match data_loader.load(SOURCE_SOLICITACOES).await {
                Ok(records) => {
                    let stats = loader::statistics(&records);
                    println!("total: {}  today: {}", stats.total, stats.today);
                    for (st, count) in &stats.by_status {
                        println!("  {st}: {count}");
                    }
                    status = String::from("ok");
                }
                Err(e) => status = format!("load failed: {e}"),
            }
        } else if let Some(file) = command.strip_prefix("export ") {
            let view = ctrl.view();
            let headers = export::collect_headers(&view.records);
            let csv_text = export::to_csv(&headers, &view.records, ';');
            match std::fs::write(file.trim(), csv_text) {
                Ok(()) => status = format!("exported {} records", view.records.len()),
                Err(e) => status = format!("export failed: {e}"),
            }
        } else {
            status = String::from("invalid command");
        }
    }

    Ok(())
}
