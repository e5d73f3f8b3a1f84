use crate::catalog::{AddOptions, MonitorType, QualityProfile, RootFolder, Series};
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, AddSeriesView, FormField, KeyBinding, ScreenView};

use super::list::ListCursor;
use super::{clean_series, drop_stale, Cx, Exit, Nav};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddPhase {
    LoadFolders(OpId),
    Form,
    Submitting(OpId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    RootFolder,
    Monitor,
    Profile,
    SeasonFolder,
    SearchMissing,
    Submit,
}

const FIELDS: [Field; 6] = [
    Field::RootFolder,
    Field::Monitor,
    Field::Profile,
    Field::SeasonFolder,
    Field::SearchMissing,
    Field::Submit,
];

fn step(index: usize, len: usize, forward: bool) -> usize {
    match (len, forward) {
        (0, _) => 0,
        (_, true) => (index + 1) % len,
        (_, false) => (index + len - 1) % len,
    }
}

/// Form for adding a lookup result to the library.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddSeriesScreen {
    id: ScreenId,
    client: ClientId,
    series: Series,
    profiles: Vec<QualityProfile>,
    folders: Vec<RootFolder>,
    folder: usize,
    profile: usize,
    monitor: MonitorType,
    season_folder: bool,
    search_missing: bool,
    cursor: ListCursor,
    phase: AddPhase,
}

impl AddSeriesScreen {
    /// Preselects the profile named `default_profile`, else the first one.
    pub(crate) fn open(
        cx: &mut Cx<'_>,
        client: ClientId,
        series: Series,
        profiles: Vec<QualityProfile>,
        default_profile: Option<&str>,
    ) -> Self {
        let id = cx.new_screen_id();
        let profile = default_profile
            .and_then(|name| profiles.iter().position(|p| p.name == name))
            .unwrap_or(0);
        let op = cx.dispatch(id, CommandKind::Fetch, Request::RootFolders { client });
        Self {
            id,
            client,
            series,
            profiles,
            folders: Vec::new(),
            folder: 0,
            profile,
            monitor: MonitorType::All,
            season_folder: true,
            search_missing: true,
            cursor: ListCursor::default(),
            phase: AddPhase::LoadFolders(op),
        }
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn busy(&self) -> bool {
        self.phase != AddPhase::Form
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => self.on_completed(cx, done),
            Msg::Completed(done) => {
                drop_stale(&done);
                Nav::Stay
            }
            Msg::Key(Key::Esc) => Nav::Back(Exit::Plain),
            Msg::Key(key) if self.phase == AddPhase::Form => self.on_key(cx, key),
            Msg::Mouse(mouse) if self.phase == AddPhase::Form => {
                self.cursor.on_mouse(mouse, FIELDS.len());
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) -> Nav {
        match self.phase {
            AddPhase::LoadFolders(op) if op == done.op => {
                self.phase = AddPhase::Form;
                match done.result {
                    Ok(Response::RootFolders(folders)) => {
                        self.folders = folders;
                        self.folder = 0;
                    }
                    Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                    Err(err) => cx.error(format!("Failed to load root folders: {err}")),
                }
                Nav::Stay
            }
            AddPhase::Submitting(op) if op == done.op => {
                self.phase = AddPhase::Form;
                match done.result {
                    Ok(Response::Series(added)) => {
                        return Nav::Back(Exit::SeriesAdded(Box::new(clean_series(added))))
                    }
                    Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
                    Err(err) => cx.error(format!("Failed to add series: {err}")),
                }
                Nav::Stay
            }
            _ => {
                drop_stale(&done);
                Nav::Stay
            }
        }
    }

    fn on_key(&mut self, cx: &mut Cx<'_>, key: Key) -> Nav {
        let field = FIELDS[self.cursor.index()];
        match key {
            Key::Ctrl('a') => self.submit(cx),
            Key::Enter if field == Field::Submit => self.submit(cx),
            Key::Enter | Key::Right | Key::Char('l') | Key::Char(' ') => self.cycle(field, true),
            Key::Left | Key::Char('h') => self.cycle(field, false),
            Key::Tab => self.cursor.set((self.cursor.index() + 1) % FIELDS.len(), FIELDS.len()),
            key => {
                self.cursor.on_key(key, FIELDS.len());
            }
        }
        Nav::Stay
    }

    fn cycle(&mut self, field: Field, forward: bool) {
        match field {
            Field::RootFolder => self.folder = step(self.folder, self.folders.len(), forward),
            Field::Monitor => {
                let index = MonitorType::ALL
                    .iter()
                    .position(|m| *m == self.monitor)
                    .unwrap_or(0);
                self.monitor = MonitorType::ALL[step(index, MonitorType::ALL.len(), forward)];
            }
            Field::Profile => self.profile = step(self.profile, self.profiles.len(), forward),
            Field::SeasonFolder => self.season_folder = !self.season_folder,
            Field::SearchMissing => self.search_missing = !self.search_missing,
            Field::Submit => {}
        }
    }

    fn submit(&mut self, cx: &mut Cx<'_>) {
        let Some(folder) = self.folders.get(self.folder) else {
            cx.error("No root folder available");
            return;
        };
        let mut series = self.series.clone();
        series.root_folder_path = Some(folder.path.clone());
        series.quality_profile_id = self.profiles.get(self.profile).map(|p| p.id);
        series.monitored = self.monitor != MonitorType::None;
        series.season_folder = self.season_folder;
        if series.series_type.is_empty() {
            series.series_type = "standard".to_string();
        }
        series.add_options = Some(AddOptions {
            monitor: self.monitor,
            search_for_missing_episodes: self.search_missing,
            search_for_cutoff_unmet_episodes: false,
        });
        let op = cx.dispatch(
            self.id,
            CommandKind::Mutation,
            Request::AddSeries {
                client: self.client,
                series: Box::new(series),
            },
        );
        self.phase = AddPhase::Submitting(op);
    }

    fn value(&self, field: Field) -> String {
        let yes_no = |flag: bool| String::from(if flag { "yes" } else { "no" });
        match field {
            Field::RootFolder => self
                .folders
                .get(self.folder)
                .map_or_else(|| "-".to_string(), |f| f.path.clone()),
            Field::Monitor => self.monitor.label().to_string(),
            Field::Profile => self
                .profiles
                .get(self.profile)
                .map_or_else(|| "-".to_string(), |p| p.name.clone()),
            Field::SeasonFolder => yes_no(self.season_folder),
            Field::SearchMissing => yes_no(self.search_missing),
            Field::Submit => String::new(),
        }
    }

    pub(crate) fn view(&self) -> ScreenView {
        let label = |field: Field| match field {
            Field::RootFolder => "Root folder",
            Field::Monitor => "Monitor",
            Field::Profile => "Quality profile",
            Field::SeasonFolder => "Season folder",
            Field::SearchMissing => "Search for missing episodes",
            Field::Submit => "[ Add ]",
        };
        ScreenView::AddSeries(AddSeriesView {
            title: self.series.title.clone(),
            year: self.series.year,
            loading: matches!(self.phase, AddPhase::LoadFolders(_)),
            submitting: matches!(self.phase, AddPhase::Submitting(_)),
            fields: FIELDS
                .iter()
                .map(|&field| FormField {
                    label: label(field),
                    value: self.value(field),
                })
                .collect(),
            cursor: self.cursor.index(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("up/down", "choose field"),
            bind("left/right", "change value"),
            bind("enter", "change / add"),
            bind("ctrl+a", "add"),
            bind("esc", "back"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::step;

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(0, 3, false), 2);
        assert_eq!(step(2, 3, true), 0);
        assert_eq!(step(0, 0, true), 0);
    }
}
