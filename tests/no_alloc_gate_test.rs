use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use match_three::core::{GridConfig, TurnController};
use match_three::types::Coordinate;

struct CountingAlloc;

static COUNT_ENABLED: AtomicBool = AtomicBool::new(false);
static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if COUNT_ENABLED.load(Ordering::Relaxed) {
            ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        System.realloc(ptr, layout, new_size)
    }
}

fn with_alloc_counting<F: FnOnce()>(f: F) -> usize {
    ALLOC_COUNT.store(0, Ordering::Relaxed);
    COUNT_ENABLED.store(true, Ordering::Relaxed);
    f();
    COUNT_ENABLED.store(false, Ordering::Relaxed);
    ALLOC_COUNT.load(Ordering::Relaxed)
}

#[test]
fn match_detection_and_selection_do_not_allocate() {
    // Board generation allocates; keep it outside the gate.
    let mut controller = TurnController::new(GridConfig::default(), 1).unwrap();
    let size = controller.grid().size() as i32;

    let allocs = with_alloc_counting(|| {
        // Match scans run on fixed-capacity buffers.
        for y in 0..size {
            for x in 0..size {
                let set = controller.grid().match_at(Coordinate::new(x, y));
                assert!(set.is_empty());
            }
        }
        assert!(!controller.grid().has_match());

        // Selection changes only touch controller state.
        for i in 0..50 {
            let coord = Coordinate::new(i % size, (i / 3) % size);
            let _ = controller.pick(coord);
            let _ = controller.cancel();
            let _ = controller.pick(Coordinate::new(-1, i));
        }
        let _ = controller.check_completion();
    });

    assert!(allocs == 0);
}
