#![no_main]

use libfuzzer_sys::fuzz_target;
use navstack::{Mode, NavStack, Options, TokenStrategy};
use platform::{MemoryHistory, RouteDef, TableRouter};
use router_api::{Location, Router};

const PATHS: [&str; 5] = ["/", "/a", "/b", "/a/b", "/c"];

fuzz_target!(|data: &[u8]| {
    let Some((&first, ops)) = data.split_first() else {
        return;
    };
    let mode = match first % 3 {
        0 => Mode::Query,
        1 => Mode::HistoryState(TokenStrategy::Timestamp),
        _ => Mode::HistoryState(TokenStrategy::Depth),
    };
    let router = TableRouter::new(vec![RouteDef::leaf("*", "Page")]);
    let Ok(mut nav) = NavStack::install(Options::new(router).mode(mode), MemoryHistory::new("/"))
    else {
        return;
    };
    let _ = nav.start();

    for &byte in ops {
        let path = PATHS[usize::from(byte >> 4) % PATHS.len()];
        match byte & 0x0f {
            0..=4 => {
                let _ = nav.push(Location::path(path));
            }
            5 | 6 => {
                let _ = nav.replace(Location::path(path));
            }
            7 => nav.back(),
            8 => nav.forward(),
            9 => nav.go(i32::from(byte >> 4) - 8),
            10 => {
                nav.host_mut().user_back();
            }
            11 => {
                nav.host_mut().user_forward();
            }
            12 => nav.host_mut().user_enter_url(path),
            13 => nav.host_mut().clear_state(),
            // Leave deferred work queued into the next operation.
            _ => {}
        }
        while nav.host_mut().take_popstate() {
            let _ = nav.on_popstate();
        }
        if byte & 0x0f < 14 {
            nav.tick();
        }

        let full = nav.view().full();
        assert!(full.windows(2).all(|w| w[0].seq < w[1].seq));
        if let Some(top) = nav.view().current().filter(|_| nav.pending_tasks() == 0) {
            assert_eq!(top.route.full_path, nav.router().current_route().full_path);
        }
    }
});
