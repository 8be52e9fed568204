use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;

use dispatch_cli::input::{
    parse_assignment, parse_preset_value, parse_query, parse_ticket_id, read_tickets,
};
use dispatch_core::{ConsoleConfig, DispatchConsole, DispatchPayload, ResourceRanker};
use dispatch_presets::PresetRepository;

use crate::cli::{
    AssembleArgs, FilterArgs, OptionsArgs, PresetArgs, PresetCommand, ResourcesArgs, TicketsArg,
};
use crate::tables::{print_filtered, print_options, print_presets, print_projects, print_resources};

pub fn load_config(path: Option<&Path>) -> Result<ConsoleConfig> {
    match path {
        Some(path) => ConsoleConfig::load(path).context("load console config"),
        None => Ok(ConsoleConfig::default()),
    }
}

fn console_for(config: &ConsoleConfig, tickets: &TicketsArg) -> Result<DispatchConsole> {
    let mut console = DispatchConsole::standard(config.clone(), Local::now().date_naive())
        .context("build dispatch form")?;
    console.set_tickets(read_tickets(&tickets.tickets)?);
    Ok(console)
}

fn presets_path(explicit: Option<&PathBuf>, config: &ConsoleConfig) -> Result<PathBuf> {
    explicit
        .or(config.presets_file.as_ref())
        .cloned()
        .ok_or_else(|| anyhow!("no presets file: pass --presets or set presets_file in the config"))
}

pub fn run_filter(args: &FilterArgs, config: &ConsoleConfig) -> Result<()> {
    let mut console = console_for(config, &args.tickets)?;
    if let Some(id) = &args.preset {
        let repository = PresetRepository::new(presets_path(args.presets.as_ref(), config)?);
        let store = repository.load().context("load presets")?;
        if !store.contains(id) {
            bail!("unknown preset {id}");
        }
        console.set_presets(store);
        console.load_preset(Some(id.as_str()));
    }
    if let Some(query) = &args.query {
        console.search(&parse_query(query)?, true);
    }
    for property in &args.hide {
        console.toggle_column(property);
    }
    print_filtered(&console);
    Ok(())
}

pub fn run_options(args: &OptionsArgs, config: &ConsoleConfig) -> Result<()> {
    let console = console_for(config, &args.tickets)?;
    if !console
        .columns()
        .iter()
        .any(|column| column.property == args.column)
    {
        bail!("unknown column {}", args.column);
    }
    print_options(&console.column_options(&args.column));
    Ok(())
}

pub fn run_resources(args: &ResourcesArgs, config: &ConsoleConfig) -> Result<()> {
    let pool = read_tickets(&args.tickets.tickets)?;
    let ranker = ResourceRanker::new(config.resource_sources.iter().cloned());
    let ranked = ranker.rank(pool.records(), args.current.as_deref().unwrap_or_default());
    print_resources(&ranked);
    Ok(())
}

pub fn run_preset(args: &PresetArgs, config: &ConsoleConfig) -> Result<()> {
    let repository = PresetRepository::new(presets_path(args.presets.as_ref(), config)?);
    let store = repository.load().context("load presets")?;
    match &args.command {
        PresetCommand::List => print_presets(&store.list_by_recency()),
        PresetCommand::Show { id } => {
            let preset = store
                .get(id)
                .ok_or_else(|| anyhow!("unknown preset {id}"))?;
            println!("{}", serde_json::to_string_pretty(preset)?);
        }
        PresetCommand::Add {
            label,
            query,
            actor,
        } => {
            let next = store.add(label, parse_preset_value(query)?, actor);
            repository.save(&next).context("save presets")?;
            if let Some(preset) = next.last() {
                println!("{}", preset.id);
            }
        }
        PresetCommand::Update { id, query, actor } => {
            if !store.contains(id) {
                bail!("unknown preset {id}");
            }
            let next = store.update(id, parse_preset_value(query)?, actor);
            repository.save(&next).context("save presets")?;
        }
        PresetCommand::Remove { id } => {
            if !store.contains(id) {
                bail!("unknown preset {id}");
            }
            repository
                .save(&store.remove(id))
                .context("save presets")?;
        }
    }
    Ok(())
}

pub fn run_assemble(args: &AssembleArgs, config: &ConsoleConfig) -> Result<DispatchPayload> {
    let mut console = console_for(config, &args.tickets)?;
    for assignment in &args.set {
        let (id, value) = parse_assignment(assignment)?;
        if console.fields().get(&id).is_none() {
            bail!("unknown field {id}");
        }
        console.set_field_value(&id, value);
    }
    for id in &args.select {
        let id = parse_ticket_id(id);
        if !console.fields().is_ticket_selected(&id) {
            console.toggle_ticket(&id);
        }
    }
    if let Some(query) = &args.query {
        console.search(&parse_query(query)?, true);
    }
    if args.add_filtered {
        console.add_filtered();
    }
    let found = console.selected_tickets().len();
    let requested = console.fields().selected_ticket_ids().len();
    if found < requested {
        tracing::warn!(
            found,
            requested,
            "some selected tickets are not in the tickets file"
        );
    }
    Ok(console.assemble()?)
}

pub fn run_summary(args: &TicketsArg) -> Result<()> {
    print_projects(&read_tickets(&args.tickets)?);
    Ok(())
}
