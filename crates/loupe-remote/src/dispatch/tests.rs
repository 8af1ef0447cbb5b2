use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mockall::{Sequence, mock};
use rstest::{fixture, rstest};

use super::*;
use crate::viewer::Viewer;

mock! {
    Viewer {}
    impl Viewer for Viewer {
        fn next_image(&mut self);
        fn previous_image(&mut self);
        fn first_image(&mut self);
        fn last_image(&mut self);
        fn fullscreen_toggle(&mut self);
        fn fullscreen_start(&mut self);
        fn fullscreen_stop(&mut self);
        fn slideshow_toggle(&mut self);
        fn slideshow_start(&mut self);
        fn slideshow_stop(&mut self);
        fn slideshow_start_from_list(&mut self, paths: Vec<PathBuf>);
        fn set_slideshow_delay(&mut self, delay: Duration);
        fn tools_hidden(&self) -> Option<bool>;
        fn set_tools_hidden(&mut self, hidden: bool);
        fn open_path(&mut self, path: &Path);
        fn open_collection(&mut self, path: &Path);
        fn open_in_new_window(&mut self, path: &Path);
        fn show_collection(&mut self, collection: &CommandCollection, first: &Path);
        fn raise_window(&mut self);
        fn request_quit(&mut self);
    }
}

type MockDispatcher = Dispatcher<RemoteContext<MockViewer>>;

fn dispatcher(viewer: MockViewer) -> MockDispatcher {
    Dispatcher::new(RemoteContext::new(viewer, SlideshowSettings::new(0.1, 3600.0)))
}

#[fixture]
fn workspace() -> tempfile::TempDir {
    tempfile::tempdir().expect("temp dir")
}

fn expect_next(viewer: &mut MockViewer) {
    viewer.expect_next_image().times(1).return_const(());
}

fn expect_previous(viewer: &mut MockViewer) {
    viewer.expect_previous_image().times(1).return_const(());
}

fn expect_last(viewer: &mut MockViewer) {
    viewer.expect_last_image().times(1).return_const(());
}

fn expect_fullscreen_stop(viewer: &mut MockViewer) {
    viewer.expect_fullscreen_stop().times(1).return_const(());
}

fn expect_slideshow_toggle(viewer: &mut MockViewer) {
    viewer.expect_slideshow_toggle().times(1).return_const(());
}

fn expect_slideshow_start(viewer: &mut MockViewer) {
    viewer.expect_slideshow_start().times(1).return_const(());
}

fn expect_quit(viewer: &mut MockViewer) {
    viewer.expect_request_quit().times(1).return_const(());
}

fn expect_raise(viewer: &mut MockViewer) {
    viewer.expect_raise_window().times(1).return_const(());
}

#[rstest]
#[case("-n", Action::NextImage, expect_next as fn(&mut MockViewer))]
#[case("--back", Action::PreviousImage, expect_previous as fn(&mut MockViewer))]
#[case("--last", Action::LastImage, expect_last as fn(&mut MockViewer))]
#[case("-fS", Action::FullscreenStop, expect_fullscreen_stop as fn(&mut MockViewer))]
#[case("-s", Action::SlideshowToggle, expect_slideshow_toggle as fn(&mut MockViewer))]
#[case("--slideshow-start", Action::SlideshowStart, expect_slideshow_start as fn(&mut MockViewer))]
#[case("-q", Action::Quit, expect_quit as fn(&mut MockViewer))]
#[case("raise", Action::Raise, expect_raise as fn(&mut MockViewer))]
fn exact_command_runs_only_its_handler(
    #[case] line: &str,
    #[case] action: Action,
    #[case] expect: fn(&mut MockViewer),
) {
    let mut viewer = MockViewer::new();
    expect(&mut viewer);
    let mut dispatcher = dispatcher(viewer);

    assert_eq!(dispatcher.dispatch(line), DispatchOutcome::Handled(action));
}

#[rstest]
#[case("", DispatchOutcome::Empty)]
#[case("--nope", DispatchOutcome::Unknown)]
#[case("-n extra", DispatchOutcome::Unknown)]
fn unmatched_lines_touch_nothing(#[case] line: &str, #[case] expected: DispatchOutcome) {
    let mut dispatcher = dispatcher(MockViewer::new());
    assert_eq!(dispatcher.dispatch(line), expected);
}

#[test]
fn handle_line_survives_unknown_commands() {
    let mut viewer = MockViewer::new();
    expect_next(&mut viewer);
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line("--unknown");
    dispatcher.handle_line("--next");
}

#[test]
fn delay_below_minimum_keeps_previous_value() {
    let mut dispatcher = dispatcher(MockViewer::new());

    let outcome = dispatcher.dispatch("--delay=0.05");

    assert!(matches!(
        outcome,
        DispatchOutcome::Rejected(Action::SlideshowDelay, CommandError::DelayOutOfRange { .. })
    ));
    assert_eq!(
        dispatcher.context().slideshow().delay_tenths(),
        SlideshowSettings::DEFAULT_DELAY_TENTHS
    );
}

#[rstest]
#[case("--delay=5", 50)]
#[case("-d2.25", 22)]
#[case("--delay=0.1", 1)]
#[case("--delay=3600", 36_000)]
fn delay_within_range_is_stored_in_tenths(#[case] line: &str, #[case] tenths: u32) {
    let mut viewer = MockViewer::new();
    viewer
        .expect_set_slideshow_delay()
        .withf(move |delay| *delay == Duration::from_millis(u64::from(tenths) * 100))
        .times(1)
        .return_const(());
    let mut dispatcher = dispatcher(viewer);

    assert_eq!(
        dispatcher.dispatch(line),
        DispatchOutcome::Handled(Action::SlideshowDelay)
    );
    assert_eq!(dispatcher.context().slideshow().delay_tenths(), tenths);
}

#[test]
fn unparsable_delay_is_rejected() {
    let mut dispatcher = dispatcher(MockViewer::new());
    assert_eq!(
        dispatcher.dispatch("--delay=soon"),
        DispatchOutcome::Rejected(
            Action::SlideshowDelay,
            CommandError::InvalidDelay {
                value: String::from("soon")
            }
        )
    );
}

#[rstest]
#[case("+t", Some(true), Some(false))]
#[case("+t", Some(false), None)]
#[case("-t", Some(false), Some(true))]
#[case("-t", Some(true), None)]
#[case("-t", None, None)]
fn tool_panel_changes_only_when_state_differs(
    #[case] line: &str,
    #[case] current: Option<bool>,
    #[case] expected: Option<bool>,
) {
    let mut viewer = MockViewer::new();
    viewer.expect_tools_hidden().return_const(current);
    match expected {
        Some(hidden) => {
            viewer
                .expect_set_tools_hidden()
                .withf(move |value| *value == hidden)
                .times(1)
                .return_const(());
        }
        None => {
            viewer.expect_set_tools_hidden().never();
        }
    }
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line(line);
}

#[test]
fn list_add_shows_collection_when_it_becomes_non_empty() {
    let mut viewer = MockViewer::new();
    let mut sequence = Sequence::new();
    viewer
        .expect_show_collection()
        .withf(|collection, first| {
            collection.len() == 1
                && collection.name() == COMMAND_COLLECTION_NAME
                && first.to_path_buf() == PathBuf::from("/tmp/a.jpg")
        })
        .times(1)
        .in_sequence(&mut sequence)
        .return_const(());
    viewer
        .expect_show_collection()
        .withf(|collection, first| {
            collection.len() == 1 && first.to_path_buf() == PathBuf::from("/tmp/c.jpg")
        })
        .times(1)
        .in_sequence(&mut sequence)
        .return_const(());
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line("--list-add:/tmp/a.jpg");
    dispatcher.handle_line("--list-add:/tmp/b.jpg");
    let entries = dispatcher
        .context()
        .command_collection()
        .map(|collection| collection.entries().to_vec());
    assert_eq!(
        entries,
        Some(vec![PathBuf::from("/tmp/a.jpg"), PathBuf::from("/tmp/b.jpg")])
    );

    dispatcher.handle_line("--list-clear");
    assert!(dispatcher.context().command_collection().is_none());
    dispatcher.handle_line("--list-add:/tmp/c.jpg");
}

#[test]
fn list_add_requires_a_path() {
    let mut dispatcher = dispatcher(MockViewer::new());
    assert!(matches!(
        dispatcher.dispatch("--list-add:"),
        DispatchOutcome::Rejected(Action::ListAdd, CommandError::MissingPath { .. })
    ));
    assert!(dispatcher.context().command_collection().is_none());
}

#[rstest]
fn file_command_opens_existing_files_and_directories(workspace: tempfile::TempDir) {
    let image = workspace.path().join("a.jpg");
    let collection = workspace.path().join("set.lpc");
    fs::write(&image, b"img").expect("write image");
    fs::write(&collection, b"#collection").expect("write collection");

    let mut viewer = MockViewer::new();
    let expected_image = image.clone();
    viewer
        .expect_open_path()
        .withf(move |path| path.to_path_buf() == expected_image)
        .times(1)
        .return_const(());
    let expected_dir = workspace.path().to_path_buf();
    viewer
        .expect_open_path()
        .withf(move |path| path.to_path_buf() == expected_dir)
        .times(1)
        .return_const(());
    let expected_collection = collection.clone();
    viewer
        .expect_open_collection()
        .withf(move |path| path.to_path_buf() == expected_collection)
        .times(1)
        .return_const(());
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line(&format!("file:{}", image.display()));
    dispatcher.handle_line(&format!("file:{}", workspace.path().display()));
    dispatcher.handle_line(&format!("file:{}", collection.display()));
}

#[rstest]
fn file_command_ignores_missing_paths(workspace: tempfile::TempDir) {
    let mut dispatcher = dispatcher(MockViewer::new());
    let missing = workspace.path().join("missing.jpg");

    assert_eq!(
        dispatcher.dispatch(&format!("file:{}", missing.display())),
        DispatchOutcome::Handled(Action::OpenFile)
    );
}

#[test]
fn view_command_expands_home_directory() {
    let home = dirs::home_dir().expect("home directory");
    let expected = home.join("pictures/b.png");
    let mut viewer = MockViewer::new();
    viewer
        .expect_open_in_new_window()
        .withf(move |path| path.to_path_buf() == expected)
        .times(1)
        .return_const(());
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line("view:~/pictures/b.png");
}

#[rstest]
fn recursive_slideshow_restarts_with_file_list(workspace: tempfile::TempDir) {
    let root = workspace.path();
    fs::create_dir(root.join("nested")).expect("create nested");
    fs::write(root.join("one.jpg"), b"1").expect("write one");
    fs::write(root.join("nested/two.jpg"), b"2").expect("write two");
    let expected = vec![root.join("one.jpg"), root.join("nested/two.jpg")];

    let mut viewer = MockViewer::new();
    let mut sequence = Sequence::new();
    viewer
        .expect_slideshow_stop()
        .times(1)
        .in_sequence(&mut sequence)
        .return_const(());
    viewer
        .expect_slideshow_start_from_list()
        .withf(move |paths| *paths == expected)
        .times(1)
        .in_sequence(&mut sequence)
        .return_const(());
    let mut dispatcher = dispatcher(viewer);

    dispatcher.handle_line(&format!("-sr{}", root.display()));
}

#[rstest]
fn recursive_slideshow_over_empty_directory_is_a_no_op(workspace: tempfile::TempDir) {
    let mut dispatcher = dispatcher(MockViewer::new());
    assert_eq!(
        dispatcher.dispatch(&format!("--slideshow-recurse{}", workspace.path().display())),
        DispatchOutcome::Handled(Action::SlideshowRecurse)
    );
}
