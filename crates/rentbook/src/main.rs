//! `rentbook` - CLI for rentbook
//!
//! This binary is the command-line front end over the record store: it
//! collects field values from flags, calls into the library, and prints the
//! results.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use chrono::Local;
use clap::Parser;

use rentbook::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, EditCommand, ExportCommand,
    ListCommand, OutputFormat, ShowCommand, StatusCommand,
};
use rentbook::{
    init_logging, report_file_name, Config, PartitionResolver, PartnerAllowList, Query,
    RecordStore, ReportGenerator, Validated, VehicleRecord,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => handle_add(&config, cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Edit(cmd) => handle_edit(&config, cmd),
        Command::Delete(cmd) => handle_delete(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Export(cmd) => handle_export(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the user's partition, validating writes when configured to.
fn open_store(config: &Config, user: &str) -> anyhow::Result<Box<dyn RecordStore>> {
    let store = PartitionResolver::from_config(config).open(user)?;
    Ok(match PartnerAllowList::from_config(&config.validation) {
        Some(validator) => Box::new(Validated::new(store, validator)),
        None => Box::new(store),
    })
}

fn query(config: &Config, search: Option<&str>) -> Query {
    Query {
        vehicle: search.map(str::to_string),
        order: config.query.date_order,
    }
}

fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let store = open_store(config, &cmd.user)?;
    let fields = cmd.record.into_fields();
    let id = store.create(&fields)?;
    println!(
        "Vehicle {} added for {} with id {id}.",
        fields.vehicle,
        store.partition()
    );
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let store = open_store(config, &cmd.user)?;
    let record = store.get(cmd.id)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        for (column, value) in VehicleRecord::COLUMNS.iter().zip(record.cells()) {
            println!("{column:<8} {value}");
        }
    }
    Ok(())
}

fn handle_edit(config: &Config, cmd: EditCommand) -> anyhow::Result<()> {
    let store = open_store(config, &cmd.user)?;
    store.update(cmd.id, &cmd.record.into_fields())?;
    println!("Record {} saved.", cmd.id);
    Ok(())
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let store = open_store(config, &cmd.user)?;
    store.delete(cmd.id)?;
    println!("Record {} deleted.", cmd.id);
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = open_store(config, &cmd.user)?;
    let records = query(config, cmd.search.as_deref()).apply(store.list_all()?);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Plain => {
            for record in &records {
                println!("{}", record.cells().join(" | "));
            }
        }
        OutputFormat::Table => print_table(&records),
    }
    Ok(())
}

fn print_table(records: &[VehicleRecord]) {
    let rows: Vec<[String; 7]> = records.iter().map(VehicleRecord::cells).collect();

    let mut widths = VehicleRecord::COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let header = VehicleRecord::COLUMNS.map(String::from);
    println!("{}", format_row(header.as_slice()));
    println!("{}", widths.map(|w| "-".repeat(w)).join("  "));
    for row in &rows {
        println!("{}", format_row(row.as_slice()));
    }
    println!();
    println!("{} records", rows.len());
}

fn handle_export(config: &Config, cmd: &ExportCommand) -> anyhow::Result<()> {
    let resolver = PartitionResolver::from_config(config);
    let store = resolver.open(&cmd.user)?;
    let records = query(config, cmd.search.as_deref()).apply(store.list_all()?);

    let dir = cmd.output.clone().unwrap_or_else(|| config.report_dir());
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create report directory {}", dir.display()))?;
    let file_name = report_file_name(store.partition());

    let meta = ReportGenerator::from_config(&config.report).render(&records, dir.join(&file_name))?;

    #[allow(clippy::cast_precision_loss)]
    let size_kb = meta.size_in_bytes as f64 / 1024.0;
    println!("PDF generated: {file_name}");
    println!("  Filename: {}", meta.destination_path.display());
    println!("  Size:     {size_kb:.2} KB");
    println!(
        "  Date:     {}",
        meta.generated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Rows:     {} ({} pages)", meta.rows, meta.pages);
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let store = PartitionResolver::from_config(config).open(&cmd.user)?;
    let stats = store.stats()?;

    if cmd.json {
        let status = serde_json::json!({
            "partition": stats.partition,
            "database_path": store.path(),
            "total_records": stats.total_records,
            "last_assigned_id": stats.last_assigned_id,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("rentbook status");
        println!("---------------");
        println!("Partition:     {}", stats.partition);
        println!("Database:      {}", store.path().display());
        println!("Records:       {}", stats.total_records);
        println!(
            "Last id:       {}",
            stats
                .last_assigned_id
                .map_or_else(|| "-".to_string(), |id| id.to_string())
        );
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!();
                println!("[Partitions]");
                for (user, key) in &config.partitions.users {
                    println!("  {user:<18}  {key}");
                }
                println!();
                println!("[Query]");
                println!("  Date order:         {:?}", config.query.date_order);
                println!();
                println!("[Report]");
                println!("  Output directory:   {}", config.report_dir().display());
                println!(
                    "  Header image:       {}",
                    config
                        .report
                        .header_image
                        .as_ref()
                        .map_or_else(|| "none".to_string(), |p| p.display().to_string())
                );
                println!("  Title:              {}", config.report.title);
                println!(
                    "  Font:               {}",
                    config
                        .report
                        .font
                        .as_ref()
                        .map_or_else(|| "Helvetica".to_string(), |p| p.display().to_string())
                );
                println!();
                println!("[Validation]");
                println!("  Enabled:            {}", config.validation.enabled);
                println!(
                    "  Partners:           {}",
                    config.validation.partners.join(", ")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
