// Copyright 2025 the drawmark authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Drawmark harness
// Hosts the benchmark session in a winit window: init once, step per frame.

use anyhow::Result;
use drawmark_core::gfx::DrawDevice;
use drawmark_core::{BenchSession, LogSink};
use drawmark_wgpu::{WgpuContext, WgpuDrawDevice};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// The per-window state of the running harness, managed by the winit event
/// loop. The session only exists once a window and device exist.
#[derive(Default)]
struct HarnessState {
    window: Option<Arc<Window>>,
    session: Option<BenchSession<WgpuDrawDevice, LogSink>>,
}

impl HarnessState {
    fn build_session(&mut self, window: Arc<Window>) -> Result<()> {
        let size = window.inner_size();
        let context = WgpuContext::new(window)?;
        let device = WgpuDrawDevice::new(context);

        let mut session = BenchSession::new(device, LogSink);
        session.init(size.width, size.height)?;
        self.session = Some(session);
        Ok(())
    }
}

impl ApplicationHandler for HarnessState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Avoid re-initializing if the app is resumed multiple times.
        }

        log::info!("Harness resumed. Creating window and graphics device...");
        let attributes = Window::default_attributes().with_title("drawmark");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.build_session(window.clone()) {
            // A session that failed to initialize must never be stepped.
            log::error!("Benchmark initialization failed: {err:#}");
            event_loop.exit();
            return;
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(session) = self.session.as_mut() {
                    session
                        .device_mut()
                        .set_viewport(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };
                if let Err(err) = session.step() {
                    log::error!("Benchmark step failed: {err}");
                    event_loop.exit();
                    return;
                }
                // Keep the frames coming; the session steps once per redraw.
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new()?;
    let mut state = HarnessState::default();
    event_loop.run_app(&mut state)?;
    Ok(())
}
