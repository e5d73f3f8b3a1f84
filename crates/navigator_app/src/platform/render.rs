//! Plain-text rendering of the view model.

use std::fmt::Write;

use navigator_core::{
    AddSeriesView, AppViewModel, ClientsView, ConfirmDeleteView, ConfirmRemoveView, DetailView,
    EpisodeDetailView, ScreenView, SearchView, SeasonView, SeriesListView, Severity,
};

/// Title line plus the blank line under it.
const BODY_TOP: usize = 2;

/// One rendered screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    /// Screen row of the first list entry, for mapping mouse clicks.
    pub list_top: u16,
}

fn marker(selected: bool) -> &'static str {
    if selected {
        "> "
    } else {
        "  "
    }
}

fn check(flag: bool) -> char {
    if flag {
        'x'
    } else {
        ' '
    }
}

pub fn render(view: &AppViewModel) -> Frame {
    let mut out = String::new();
    match view.spinner {
        Some(frame) => {
            let _ = writeln!(out, "{} {frame}", view.title);
        }
        None => {
            let _ = writeln!(out, "{}", view.title);
        }
    }
    out.push('\n');
    let header = render_body(&mut out, &view.body);
    out.push('\n');

    if let Some(status) = &view.status {
        let prefix = match status.severity {
            Severity::Info => "",
            Severity::Error => "error: ",
        };
        let _ = writeln!(out, "{prefix}{}", status.text);
    }
    if view.show_help {
        for binding in &view.bindings {
            let _ = writeln!(out, "  {:<12} {}", binding.keys, binding.help);
        }
    } else {
        let line: Vec<String> = view
            .bindings
            .iter()
            .map(|b| format!("{} {}", b.keys, b.help))
            .collect();
        let _ = writeln!(out, "{}", line.join(" | "));
    }
    Frame {
        text: out,
        list_top: u16::try_from(BODY_TOP + header).unwrap_or(u16::MAX),
    }
}

/// Writes the body and returns how many lines precede its list rows.
fn render_body(out: &mut String, body: &ScreenView) -> usize {
    match body {
        ScreenView::Loading { message } => {
            let _ = writeln!(out, "{message}");
            0
        }
        ScreenView::Error { message } => {
            let _ = writeln!(out, "Error: {message}");
            0
        }
        ScreenView::Clients(view) => {
            clients(out, view);
            0
        }
        ScreenView::SeriesList(view) => {
            series_list(out, view);
            0
        }
        ScreenView::Detail(view) => {
            detail(out, view);
            5
        }
        ScreenView::Season(view) => {
            season(out, view);
            1
        }
        ScreenView::Episode(view) => {
            episode(out, view);
            0
        }
        ScreenView::Search(view) => {
            search(out, view);
            1
        }
        ScreenView::AddSeries(view) => {
            add_series(out, view);
            1
        }
        ScreenView::ConfirmRemove(view) => {
            confirm_remove(out, view);
            1
        }
        ScreenView::ConfirmDelete(view) => {
            confirm_delete(out, view);
            0
        }
    }
}

fn clients(out: &mut String, view: &ClientsView) {
    for (index, row) in view.rows.iter().enumerate() {
        let state = match (&row.error, row.available) {
            (Some(err), _) => format!("unavailable: {err}"),
            (None, true) => format!("{} queued", row.queued),
            (None, false) => "unavailable".to_string(),
        };
        let _ = writeln!(out, "{}{:<20} {state}", marker(index == view.cursor), row.name);
    }
}

fn series_list(out: &mut String, view: &SeriesListView) {
    if view.loading {
        let _ = writeln!(out, "Loading series...");
        return;
    }
    if view.rows.is_empty() {
        let _ = writeln!(out, "No series in library");
    }
    for (index, row) in view.rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}[{}] {} ({}) {} | {} | {} | {}/{} eps, {} seasons",
            marker(index == view.cursor),
            check(row.monitored),
            row.title,
            row.year,
            row.network,
            row.status,
            row.profile,
            row.files,
            row.episodes,
            row.seasons
        );
    }
    if view.opening {
        let _ = writeln!(out, "Opening...");
    }
}

fn detail(out: &mut String, view: &DetailView) {
    let _ = writeln!(out, "{} ({})  [{}]", view.title, view.year, check(view.monitored));
    let _ = writeln!(out, "{} | {} | {}", view.network, view.status, view.profile);
    let _ = writeln!(out, "{}", view.path);
    let _ = writeln!(out, "{}", view.overview);
    out.push('\n');
    for (index, row) in view.seasons.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}[{}] Season {}  {}/{}",
            marker(index == view.cursor),
            check(row.monitored),
            row.number,
            row.files,
            row.episodes
        );
    }
}

fn season(out: &mut String, view: &SeasonView) {
    let _ = writeln!(
        out,
        "{} - Season {}  [{}]",
        view.series_title,
        view.season,
        check(view.monitored)
    );
    if view.loading {
        let _ = writeln!(out, "Loading episodes...");
        return;
    }
    for (index, row) in view.rows.iter().enumerate() {
        let file = if row.has_file { "file" } else { "    " };
        let _ = write!(
            out,
            "{}[{}] {:>3} {file} {}",
            marker(index == view.cursor),
            check(row.monitored),
            row.number,
            row.title
        );
        if let Some(download) = &row.download {
            let _ = write!(
                out,
                "  {:.0}% {}",
                download.progress * 100.0,
                download.status
            );
        }
        out.push('\n');
    }
}

fn episode(out: &mut String, view: &EpisodeDetailView) {
    let _ = writeln!(
        out,
        "{} > Season {} > {}. {}",
        view.series_title, view.season, view.number, view.title
    );
    if let Some(rows) = &view.media_info {
        let width = rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let _ = writeln!(out, "Media Info");
        for row in rows {
            let _ = writeln!(out, "  {:>width$}  {}", row.label, row.value);
        }
        return;
    }
    let _ = writeln!(out, "Airs: {} on {}", view.airs, view.network);
    let _ = writeln!(out, "{}", view.overview);
    if view.loading {
        let _ = writeln!(out, "Loading episode...");
        return;
    }
    match &view.file {
        Some(file) => {
            let _ = writeln!(out, "{}", file.path);
            let _ = writeln!(
                out,
                "{} | {} | {}",
                file.size, file.language, file.quality
            );
        }
        None => {
            let _ = writeln!(out, "No file on disk");
        }
    }
}

fn search(out: &mut String, view: &SearchView) {
    let suffix = if view.searching { " (searching)" } else { "" };
    let _ = writeln!(out, "Search: {}{suffix}", view.input);
    if !view.showing_results {
        return;
    }
    for (index, row) in view.results.iter().enumerate() {
        let owned = if row.in_library { " (in library)" } else { "" };
        let _ = writeln!(
            out,
            "{}{} ({}) {}{owned}",
            marker(index == view.cursor),
            row.title,
            row.year,
            row.network
        );
    }
}

fn add_series(out: &mut String, view: &AddSeriesView) {
    let _ = writeln!(out, "Add {} ({})", view.title, view.year);
    if view.loading {
        let _ = writeln!(out, "Loading root folders...");
        return;
    }
    for (index, field) in view.fields.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}{:<28} {}",
            marker(index == view.cursor),
            field.label,
            field.value
        );
    }
    if view.submitting {
        let _ = writeln!(out, "Adding...");
    }
}

fn confirm_remove(out: &mut String, view: &ConfirmRemoveView) {
    let _ = writeln!(
        out,
        "Remove {} ({} files on disk)?",
        view.title, view.file_count
    );
    let options = [
        format!("[{}] Delete files", check(view.delete_files)),
        format!("[{}] Add import list exclusion", check(view.add_exclusion)),
        "[ Remove ]".to_string(),
    ];
    for (index, option) in options.iter().enumerate() {
        let _ = writeln!(out, "{}{option}", marker(index == view.cursor));
    }
    if view.removing {
        let _ = writeln!(out, "Removing...");
    }
}

fn confirm_delete(out: &mut String, view: &ConfirmDeleteView) {
    let _ = writeln!(out, "Delete file of {}?", view.label);
    let (yes, no) = if view.yes_selected {
        ("[Yes]", " No ")
    } else {
        (" Yes ", "[No]")
    };
    let _ = writeln!(out, "{yes}  {no}");
    if view.deleting {
        let _ = writeln!(out, "Deleting...");
    }
}
