//! Generic adapter connecting a vertex source to a vertex generator.
//!
//! Port of `agg_conv_adaptor_vcgen.h`. The source path is split into
//! sub-paths at every `move_to`; each sub-path is fed to the generator and
//! the generator's output is yielded before the next one is read.

use log::trace;

use crate::basics::{
    is_end_poly, is_move_to, is_stop, is_vertex, VertexSource, PATH_CMD_MOVE_TO, PATH_CMD_STOP,
};

// ============================================================================
// VcgenGenerator trait
// ============================================================================

/// Vertex generator interface used by `ConvAdaptorVcgen`.
///
/// A generator accumulates one sub-path through `add_vertex` and then
/// replays its own output through `rewind`/`vertex`.
pub trait VcgenGenerator {
    fn remove_all(&mut self);
    fn add_vertex(&mut self, x: f64, y: f64, cmd: u32);
    fn rewind(&mut self, path_id: u32);
    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32;
}

// ============================================================================
// ConvAdaptorVcgen
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Status {
    Initial,
    Accumulate,
    Generate,
}

/// Generic adapter connecting a `VertexSource` to a `VcgenGenerator`.
///
/// Port of C++ `conv_adaptor_vcgen<VertexSource, Generator>`, without
/// markers.
#[derive(Debug, Clone)]
pub struct ConvAdaptorVcgen<VS, Gen> {
    source: VS,
    generator: Gen,
    status: Status,
    last_cmd: u32,
    start_x: f64,
    start_y: f64,
}

impl<VS: VertexSource, Gen: VcgenGenerator> ConvAdaptorVcgen<VS, Gen> {
    pub fn new(source: VS, generator: Gen) -> Self {
        Self {
            source,
            generator,
            status: Status::Initial,
            last_cmd: PATH_CMD_STOP,
            start_x: 0.0,
            start_y: 0.0,
        }
    }

    pub fn generator(&self) -> &Gen {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut Gen {
        &mut self.generator
    }

    pub fn source(&self) -> &VS {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut VS {
        &mut self.source
    }

    /// Read the next sub-path from the source into the generator.
    fn accumulate(&mut self, x: &mut f64, y: &mut f64) {
        self.generator.remove_all();
        self.generator
            .add_vertex(self.start_x, self.start_y, PATH_CMD_MOVE_TO);
        let mut fed = 1;

        loop {
            let cmd = self.source.vertex(x, y);
            if is_vertex(cmd) {
                self.last_cmd = cmd;
                if is_move_to(cmd) {
                    self.start_x = *x;
                    self.start_y = *y;
                    break;
                }
                self.generator.add_vertex(*x, *y, cmd);
                fed += 1;
            } else if is_stop(cmd) {
                self.last_cmd = PATH_CMD_STOP;
                break;
            } else if is_end_poly(cmd) {
                self.generator.add_vertex(*x, *y, cmd);
                break;
            }
        }
        trace!("conv_adaptor_vcgen: sub-path with {} vertices", fed);
    }
}

impl<VS: VertexSource, Gen: VcgenGenerator> VertexSource for ConvAdaptorVcgen<VS, Gen> {
    fn rewind(&mut self, path_id: u32) {
        self.source.rewind(path_id);
        self.status = Status::Initial;
    }

    fn vertex(&mut self, x: &mut f64, y: &mut f64) -> u32 {
        loop {
            match self.status {
                Status::Initial => {
                    self.last_cmd = self.source.vertex(&mut self.start_x, &mut self.start_y);
                    self.status = Status::Accumulate;
                }
                Status::Accumulate => {
                    if is_stop(self.last_cmd) {
                        return PATH_CMD_STOP;
                    }
                    self.accumulate(x, y);
                    self.generator.rewind(0);
                    self.status = Status::Generate;
                }
                Status::Generate => {
                    let cmd = self.generator.vertex(x, y);
                    if !is_stop(cmd) {
                        return cmd;
                    }
                    self.status = Status::Accumulate;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
