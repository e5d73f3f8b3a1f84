//! Confirmation dialogs for destructive operations.
use crate::catalog::{DeleteOptions, EntryId, Series};
use crate::effect::{ClientId, CommandKind, OpId, Request, ScreenId};
use crate::msg::{CommandError, Completion, Key, Msg, Response};
use crate::view_model::{bind, ConfirmDeleteView, ConfirmRemoveView, KeyBinding, ScreenView};

use super::list::{ListAction, ListCursor};
use super::{drop_stale, Cx, Exit, Nav};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveOption {
    DeleteFiles,
    AddExclusion,
    Remove,
}

const REMOVE_OPTIONS: [RemoveOption; 3] = [
    RemoveOption::DeleteFiles,
    RemoveOption::AddExclusion,
    RemoveOption::Remove,
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfirmRemove {
    id: ScreenId,
    client: ClientId,
    series_id: EntryId,
    title: String,
    file_count: i32,
    options: DeleteOptions,
    cursor: ListCursor,
    pending: Option<OpId>,
}

impl ConfirmRemove {
    pub(crate) fn new(id: ScreenId, client: ClientId, series: &Series) -> Self {
        Self {
            id,
            client,
            series_id: series.id,
            title: series.title.clone(),
            file_count: series.episode_file_count(),
            options: DeleteOptions::default(),
            cursor: ListCursor::default(),
            pending: None,
        }
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => self.on_completed(cx, done),
            Msg::Completed(done) => {
                drop_stale(&done);
                Nav::Stay
            }
            _ if self.pending.is_some() => Nav::Stay,
            Msg::Key(Key::Esc) => Nav::Back(Exit::Plain),
            Msg::Key(Key::Ctrl('d')) => {
                self.submit(cx);
                Nav::Stay
            }
            Msg::Key(Key::Enter) => {
                self.activate(cx);
                Nav::Stay
            }
            Msg::Key(Key::Char(' ')) => {
                self.toggle();
                Nav::Stay
            }
            Msg::Key(key) => {
                self.cursor.on_key(key, REMOVE_OPTIONS.len());
                Nav::Stay
            }
            Msg::Mouse(mouse) => {
                if self.cursor.on_mouse(mouse, REMOVE_OPTIONS.len()) == ListAction::Activate {
                    self.activate(cx);
                }
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) -> Nav {
        if self.pending != Some(done.op) {
            drop_stale(&done);
            return Nav::Stay;
        }
        self.pending = None;
        match done.result {
            Ok(Response::Done) => return Nav::Back(Exit::SeriesRemoved(self.series_id)),
            Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
            Err(err) => cx.error(format!("Failed to remove series: {err}")),
        }
        Nav::Stay
    }

    fn activate(&mut self, cx: &mut Cx<'_>) {
        match REMOVE_OPTIONS[self.cursor.index()] {
            RemoveOption::Remove => self.submit(cx),
            _ => self.toggle(),
        }
    }

    fn toggle(&mut self) {
        match REMOVE_OPTIONS[self.cursor.index()] {
            RemoveOption::DeleteFiles => self.options.delete_files = !self.options.delete_files,
            RemoveOption::AddExclusion => {
                self.options.add_import_list_exclusion = !self.options.add_import_list_exclusion
            }
            RemoveOption::Remove => {}
        }
    }

    fn submit(&mut self, cx: &mut Cx<'_>) {
        let op = cx.dispatch(
            self.id,
            CommandKind::Mutation,
            Request::DeleteSeries {
                client: self.client,
                id: self.series_id,
                options: self.options,
            },
        );
        self.pending = Some(op);
    }

    pub(crate) fn view(&self) -> ScreenView {
        ScreenView::ConfirmRemove(ConfirmRemoveView {
            title: self.title.clone(),
            file_count: self.file_count,
            delete_files: self.options.delete_files,
            add_exclusion: self.options.add_import_list_exclusion,
            cursor: self.cursor.index(),
            removing: self.pending.is_some(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("space", "toggle"),
            bind("ctrl+d", "remove"),
            bind("esc", "cancel"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfirmDelete {
    id: ScreenId,
    client: ClientId,
    episode_id: EntryId,
    file_id: EntryId,
    label: String,
    yes: bool,
    pending: Option<OpId>,
}

impl ConfirmDelete {
    pub(crate) fn new(
        id: ScreenId,
        client: ClientId,
        episode_id: EntryId,
        file_id: EntryId,
        label: String,
    ) -> Self {
        Self {
            id,
            client,
            episode_id,
            file_id,
            label,
            yes: false,
            pending: None,
        }
    }

    pub(crate) fn id(&self) -> ScreenId {
        self.id
    }

    pub(crate) fn busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn update(&mut self, cx: &mut Cx<'_>, msg: Msg) -> Nav {
        match msg {
            Msg::Completed(done) if done.target == self.id => self.on_completed(cx, done),
            Msg::Completed(done) => {
                drop_stale(&done);
                Nav::Stay
            }
            _ if self.pending.is_some() => Nav::Stay,
            Msg::Key(Key::Esc) => Nav::Back(Exit::Plain),
            Msg::Key(Key::Char('n')) => Nav::Back(Exit::Plain),
            Msg::Key(Key::Char('y')) => {
                self.submit(cx);
                Nav::Stay
            }
            Msg::Key(Key::Enter) if self.yes => {
                self.submit(cx);
                Nav::Stay
            }
            Msg::Key(Key::Enter) => Nav::Back(Exit::Plain),
            Msg::Key(
                Key::Left | Key::Right | Key::Tab | Key::BackTab | Key::Char('h') | Key::Char('l'),
            ) => {
                self.yes = !self.yes;
                Nav::Stay
            }
            _ => Nav::Stay,
        }
    }

    fn on_completed(&mut self, cx: &mut Cx<'_>, done: Completion) -> Nav {
        if self.pending != Some(done.op) {
            drop_stale(&done);
            return Nav::Stay;
        }
        self.pending = None;
        match done.result {
            Ok(Response::Done) => return Nav::Back(Exit::EpisodeFileDeleted(self.episode_id)),
            Ok(other) => cx.error(CommandError::unexpected(&other).to_string()),
            Err(err) => cx.error(format!("Failed to delete episode file: {err}")),
        }
        Nav::Stay
    }

    fn submit(&mut self, cx: &mut Cx<'_>) {
        let op = cx.dispatch(
            self.id,
            CommandKind::Mutation,
            Request::DeleteEpisodeFile {
                client: self.client,
                file_id: self.file_id,
            },
        );
        self.pending = Some(op);
    }

    pub(crate) fn view(&self) -> ScreenView {
        ScreenView::ConfirmDelete(ConfirmDeleteView {
            label: self.label.clone(),
            yes_selected: self.yes,
            deleting: self.pending.is_some(),
        })
    }

    pub(crate) fn bindings(&self) -> Vec<KeyBinding> {
        vec![
            bind("y", "delete"),
            bind("n/esc", "cancel"),
            bind("left/right", "choose"),
        ]
    }
}
