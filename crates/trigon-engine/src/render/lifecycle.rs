/// Build steps a renderer goes through once each.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum Stage {
    Shaders,
    Buffers,
}

impl Stage {
    fn operation(self) -> &'static str {
        match self {
            Stage::Shaders => "build_shaders",
            Stage::Buffers => "build_buffers",
        }
    }
}

/// Tracks which build steps completed.
///
/// Violations are programming errors and panic.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub(crate) struct Lifecycle {
    shaders: bool,
    buffers: bool,
}

impl Lifecycle {
    fn slot(&mut self, stage: Stage) -> &mut bool {
        match stage {
            Stage::Shaders => &mut self.shaders,
            Stage::Buffers => &mut self.buffers,
        }
    }

    pub(crate) fn is_built(&self, stage: Stage) -> bool {
        match stage {
            Stage::Shaders => self.shaders,
            Stage::Buffers => self.buffers,
        }
    }

    /// Panics if `stage` already completed.
    pub(crate) fn expect_unbuilt(&self, stage: Stage) {
        assert!(
            !self.is_built(stage),
            "Renderer::{} called more than once",
            stage.operation()
        );
    }

    pub(crate) fn mark_built(&mut self, stage: Stage) {
        self.expect_unbuilt(stage);
        *self.slot(stage) = true;
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.shaders && self.buffers
    }

    /// Panics unless every stage completed.
    pub(crate) fn assert_ready(&self) {
        for stage in [Stage::Shaders, Stage::Buffers] {
            assert!(
                self.is_built(stage),
                "Renderer::draw called before Renderer::{}",
                stage.operation()
            );
        }
    }
}
