use navstack::{Mode, NavStack, Options, TokenStrategy};
use platform::{MemoryHistory, RouteDef, TableRouter};
use proptest::prelude::*;
use router_api::{HostHistory, Location, Router};

const PATHS: [&str; 4] = ["/a", "/b", "/c", "/d"];

#[derive(Clone, Debug)]
enum Op {
    Push(usize),
    Replace(usize),
    Back,
    Forward,
    Go(i32),
    UserBack,
    UserForward,
    UserEnter(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..PATHS.len()).prop_map(Op::Push),
        2 => (0..PATHS.len()).prop_map(Op::Replace),
        2 => Just(Op::Back),
        1 => Just(Op::Forward),
        1 => (-3i32..=3).prop_map(Op::Go),
        1 => Just(Op::UserBack),
        1 => Just(Op::UserForward),
        1 => (0..PATHS.len()).prop_map(Op::UserEnter),
    ]
}

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::Query),
        Just(Mode::HistoryState(TokenStrategy::Timestamp)),
        Just(Mode::HistoryState(TokenStrategy::Depth)),
    ]
}

/// Timestamp tokens order entries by write time, so a replace made while
/// forward entries exist can leave the host list out of token order. Only
/// depth tokens keep the stack a subsequence of the host under that.
fn replace_allowed(mode: Mode, host: &MemoryHistory) -> bool {
    mode == Mode::HistoryState(TokenStrategy::Depth) || host.index() + 1 == host.entries().len()
}

fn is_subsequence(needle: &[&str], hay: &[&str]) -> bool {
    let mut hay = hay.iter();
    needle.iter().all(|n| hay.any(|h| h == n))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn stack_stays_ordered_and_consistent_with_host(
        mode in mode(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let router = TableRouter::new(vec![RouteDef::leaf("*", "Page")]);
        let mut nav = NavStack::install(Options::new(router).mode(mode), MemoryHistory::new("/"))
            .unwrap();
        nav.start().unwrap();

        for op in ops {
            match op {
                Op::Push(i) => {
                    let _ = nav.push(Location::path(PATHS[i]));
                }
                Op::Replace(i) => {
                    if replace_allowed(mode, nav.host()) {
                        let _ = nav.replace(Location::path(PATHS[i]));
                    }
                }
                Op::Back => nav.back(),
                Op::Forward => nav.forward(),
                Op::Go(delta) => nav.go(delta),
                Op::UserBack => {
                    nav.host_mut().user_back();
                }
                Op::UserForward => {
                    nav.host_mut().user_forward();
                }
                Op::UserEnter(i) => nav.host_mut().user_enter_url(PATHS[i]),
            }
            while nav.host_mut().take_popstate() {
                nav.on_popstate().unwrap();
            }
            nav.tick();

            let full = nav.view().full();
            prop_assert!(full.windows(2).all(|w| w[0].seq < w[1].seq));

            let top = nav.view().current().unwrap();
            prop_assert_eq!(&top.route.full_path, &nav.router().current_route().full_path);
            prop_assert_eq!(top.route.full_path.as_str(), nav.host().location());

            let stack: Vec<&str> = full.iter().map(|e| e.route.full_path.as_str()).collect();
            let host: Vec<&str> = nav.host().reachable().iter().map(|e| e.url.as_str()).collect();
            prop_assert!(is_subsequence(&stack, &host), "stack {:?} host {:?}", stack, host);
        }
    }

    #[test]
    fn replace_never_changes_length(
        mode in mode(),
        pushes in 1usize..6,
        replaces in prop::collection::vec(0..PATHS.len(), 1..6),
    ) {
        let router = TableRouter::new(vec![RouteDef::leaf("*", "Page")]);
        let mut nav = NavStack::install(Options::new(router).mode(mode), MemoryHistory::new("/"))
            .unwrap();
        nav.start().unwrap();
        for i in 0..pushes {
            nav.push(Location::path(format!("/p{i}"))).unwrap();
            nav.tick();
        }
        let len = nav.view().full().len();

        for i in replaces {
            // Same-path replaces are duplicates and fail without effect.
            let _ = nav.replace(Location::path(PATHS[i]));
            nav.tick();
            prop_assert_eq!(nav.view().full().len(), len);
        }
    }
}
