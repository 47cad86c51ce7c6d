//! Command dispatch: one handler per subcommand

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{Panel, Stage};
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{wrap_label, DataSource, DrillDown};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

const ORBIT: &str = "orbit";
const SUNBURST: &str = "sunburst";
const CARD: &str = "card";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see --help".to_string(),
        ));
    };

    // completions need no settings
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    // `config init` may be pointed at a file that does not exist yet
    let explicit = match command {
        Commands::Config {
            command: ConfigCommands::Init { .. },
        } => None,
        _ => cli.config.as_deref(),
    };
    let settings = Settings::load(explicit)?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file, raw } => cmd_tree(&container, file, *raw),
        Commands::Sunburst {
            file,
            focus,
            rotate,
        } => cmd_sunburst(&container, file, focus.as_deref(), *rotate),
        Commands::Focus { file, path } => cmd_focus(&container, file, path),
        Commands::Wrap { text, limit } => cmd_wrap(&container, text, *limit),
        Commands::Card {
            file,
            pdf,
            graphic,
            flip,
        } => cmd_card(&container, file, *pdf, *graphic, *flip),
        Commands::Config { command } => cmd_config(&container, cli, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn new_stage(container: &ServiceContainer, id: &str) -> Stage {
    let mut stage = container.stage();
    stage.add_container(id);
    stage
}

fn render_failure(panel: Option<&Panel>) -> CliError {
    CliError::Render(
        panel
            .and_then(Panel::error_message)
            .unwrap_or("nothing rendered")
            .to_string(),
    )
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, file: &str, raw: bool) -> CliResult<()> {
    let source = DataSource::from_path_str(file);
    if raw {
        let taxonomy = container
            .documents
            .load_taxonomy(&source, &container.settings.root_name)?;
        output::info(&taxonomy.tree.to_tree_string());
        return Ok(());
    }

    let mut stage = new_stage(container, ORBIT);
    stage.render_radar(&source, ORBIT);
    match stage.panel(ORBIT) {
        Some(Panel::Orbit(orbit)) => {
            output::info(orbit.rendered.trim_end());
            output::detail(&format!("{} nodes, {} leaves", orbit.nodes, orbit.leaves));
            Ok(())
        }
        other => Err(render_failure(other)),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_sunburst(
    container: &ServiceContainer,
    file: &str,
    focus: Option<&str>,
    rotate: i32,
) -> CliResult<()> {
    let source = DataSource::from_path_str(file);
    let mut stage = new_stage(container, SUNBURST);
    stage.render_sunburst(&source, SUNBURST);

    let Some(panel) = stage.sunburst_mut(SUNBURST) else {
        return Err(render_failure(stage.panel(SUNBURST)));
    };
    if let Some(path) = focus {
        let transition = panel.click(path)?;
        debug!("focus changed, {} arcs animate", transition.animated().count());
    }
    for _ in 0..rotate.unsigned_abs() {
        if rotate < 0 {
            panel.viewport_mut().spin_left();
        } else {
            panel.viewport_mut().spin_right();
        }
    }

    output::header(&panel.focus_title()?.replace('\n', "  "));
    output::action("rotation", &format!("{}°", panel.viewport().rotation_deg));
    for line in panel.lines() {
        let label = match &line.label {
            Some(placement) => placement.to_svg_transform(),
            None => "-".to_string(),
        };
        output::swatch(
            line.colour.as_deref(),
            &format!(
                "{} {:>6.1}..{:>6.1}  {}  [{}]",
                line.ring,
                line.start_deg(),
                line.end_deg(),
                line.path,
                label
            ),
        );
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_focus(container: &ServiceContainer, file: &str, path: &str) -> CliResult<()> {
    let source = DataSource::from_path_str(file);
    let taxonomy = container
        .documents
        .load_taxonomy(&source, &container.settings.root_name)?;
    let hierarchy = &taxonomy.hierarchy;
    let target = hierarchy.find_path(path).map_err(|e| CliError::Usage(e.to_string()))?;

    let mut drilldown = DrillDown::new(hierarchy, container.settings.visibility)
        .map_err(ApplicationError::from)?;
    let transition = drilldown
        .zoom_in(hierarchy, target)
        .map_err(ApplicationError::from)?;
    let window = transition.window;

    let title = hierarchy
        .title(target)
        .map_err(ApplicationError::from)?;
    output::header(&title.replace('\n', "  "));
    output::action(
        "angle",
        &format!("{:.4} .. {:.4}", window.angle_start, window.angle_end),
    );
    output::action(
        "depth",
        &format!("{} .. {}", window.depth_start, window.depth_end),
    );

    let up = drilldown
        .zoom_out(hierarchy)
        .map_err(ApplicationError::from)?;
    let parent = hierarchy
        .get_node(up.to)
        .map(|n| n.data.name.as_str())
        .unwrap_or_default();
    output::action("zoom out", &parent);
    output::action(
        "visible",
        &format!("{} arcs", transition.visible().count()),
    );
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_wrap(container: &ServiceContainer, text: &str, limit: Option<usize>) -> CliResult<()> {
    let limit = limit.unwrap_or(container.settings.labels.limit);
    if limit == 0 {
        return Err(CliError::InvalidArgs("limit must be at least 1".to_string()));
    }
    let block = wrap_label(text, limit, false);
    for (line, dy) in block.lines().iter().zip(block.tspan_offsets()) {
        output::info(&format!("{dy:>5}em  {line}"));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_card(
    container: &ServiceContainer,
    file: &str,
    pdf: bool,
    graphic: bool,
    flip: bool,
) -> CliResult<()> {
    let source = DataSource::from_path_str(file);
    let mut stage = new_stage(container, CARD);
    stage.render_card(&source, CARD);

    let Some(card) = stage.card_mut(CARD) else {
        return Err(CliError::Render(format!("cannot show card {file}")));
    };
    card.state.set_pdf(pdf);
    card.state.set_graphic(graphic);
    if flip {
        card.state.flip();
    }

    if card.state.flipped {
        output::header(&card.record.title);
        output::info(&card.record.description);
        let options = [("PDF", card.state.pdf), ("Graphic", card.state.graphic)];
        for (name, ticked) in options {
            if ticked {
                output::success(name);
            } else {
                output::disabled(name);
            }
        }
        if card.state.explore_enabled() {
            output::success("Explore");
        } else {
            output::disabled("Explore");
        }
    } else {
        output::header(&card.record.title);
        output::action("background", card.record.front_background());
        if let Some(image) = &card.record.card_image {
            output::action("image", image);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container, cli))]
fn cmd_config(container: &ServiceContainer, cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no config directory on this platform"),
            }
            if let Some(path) = &cli.config {
                output::action("explicit", &path.display());
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let target: PathBuf = match cli.config.clone().or_else(global_config_path) {
                Some(path) => path,
                None => {
                    return Err(CliError::Usage(
                        "no config directory on this platform, pass --config".to_string(),
                    ))
                }
            };
            if container.fs.exists(&target) && !force {
                return Err(CliError::Usage(format!(
                    "{} exists, use --force to overwrite",
                    target.display()
                )));
            }
            container
                .fs
                .ensure_parent(&target)
                .map_err(|e| InfraError::io(format!("create {}", target.display()), e))?;
            container
                .fs
                .write(&target, &Settings::template())
                .with_path_context("write config", &target)?;
            output::success(&format!("created {}", target.display()));
            Ok(())
        }
    }
}
