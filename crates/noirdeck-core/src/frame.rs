//! Per-frame tasks driven by the render loop's frame clock.

/// A repeating task run once per animation frame. Each task reads and writes
/// only its own state.
pub trait FrameTask {
    fn on_frame(&mut self);
}

/// Run one frame of every task in order
pub fn run_frame(tasks: &mut [&mut dyn FrameTask]) {
    for task in tasks.iter_mut() {
        task.on_frame();
    }
}
