use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    animation::timeline::Timeline,
    encode::sink::{FrameSink, SinkConfig},
    eval::display::DisplayList,
    eval::evaluator::Evaluator,
    eval::fingerprint::{FrameFingerprint, fingerprint_display_list},
    foundation::core::{FrameIndex, FrameRange},
    foundation::error::{ScenegridError, ScenegridResult},
    layout::solver::{Layout, solve_layout},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings, create_backend},
    render::svg::to_svg_document,
    scene::model::Scene,
};

#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Render the frames of each chunk on a `rayon` pool.
    pub parallel: bool,
    /// Frames evaluated, rendered and pushed together.
    pub chunk_size: usize,
    /// Pool size; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Render frames with identical display lists once per chunk.
    pub static_frame_elision: bool,
    pub render: RenderSettings,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
            render: RenderSettings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub frames_elided: u64,
}

/// A scene with its layout and timeline solved up front, ready to render any frame.
pub struct RenderSession {
    scene: Scene,
    layout: Layout,
    timeline: Timeline,
    backend: Box<dyn RenderBackend>,
    opts: RenderSessionOpts,
}

impl RenderSession {
    #[tracing::instrument(skip_all, fields(scene = %scene.name))]
    pub fn new(scene: Scene, opts: RenderSessionOpts) -> ScenegridResult<Self> {
        scene.validate()?;
        let layout = solve_layout(&scene)?;
        let timeline = Timeline::compile(&scene)?;
        let backend = create_backend(&opts.render)?;
        tracing::info!(
            frames = timeline.total_frames(),
            width = scene.canvas.width,
            height = scene.canvas.height,
            "render session ready"
        );
        Ok(Self {
            scene,
            layout,
            timeline,
            backend,
            opts,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn total_frames(&self) -> u64 {
        self.timeline.total_frames()
    }

    pub fn display_list(&self, frame: FrameIndex) -> ScenegridResult<DisplayList> {
        Evaluator::eval_frame(&self.scene, &self.layout, &self.timeline, frame)
    }

    /// SVG document of one frame.
    pub fn render_svg(&self, frame: FrameIndex) -> ScenegridResult<String> {
        Ok(to_svg_document(&self.display_list(frame)?))
    }

    pub fn render_frame(&self, frame: FrameIndex) -> ScenegridResult<FrameRGBA> {
        let list = self.display_list(frame)?;
        self.backend.render(&list)
    }

    /// Render `range` into `sink`, in strictly increasing frame order.
    #[tracing::instrument(skip(self, sink), fields(scene = %self.scene.name))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> ScenegridResult<RenderStats> {
        if range.is_empty() {
            return Err(ScenegridError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.timeline.total_frames() {
            return Err(ScenegridError::validation(format!(
                "render_range end {} is past the scene's {} frames",
                range.end.0,
                self.timeline.total_frames()
            )));
        }

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        let chunk_size = normalized_chunk_size(self.opts.chunk_size).min(range.len_frames());

        sink.begin(SinkConfig {
            width: self.scene.canvas.width,
            height: self.scene.canvas.height,
            fps: self.scene.fps,
        })?;

        let mut stats = RenderStats::default();
        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let lists = (chunk_start..chunk_end)
                .map(|f| self.display_list(FrameIndex(f)))
                .collect::<ScenegridResult<Vec<_>>>()?;

            // Map every frame of the chunk to the index of the list that will be rendered for it.
            let (unique, frame_to_unique) = if self.opts.static_frame_elision {
                dedupe(lists)
            } else {
                let n = lists.len();
                (lists, (0..n).collect())
            };

            let frames = match pool.as_ref() {
                Some(pool) => pool.install(|| {
                    unique
                        .par_iter()
                        .map(|l| self.backend.render(l))
                        .collect::<ScenegridResult<Vec<_>>>()
                })?,
                None => unique
                    .iter()
                    .map(|l| self.backend.render(l))
                    .collect::<ScenegridResult<Vec<_>>>()?,
            };

            for (i, f) in (chunk_start..chunk_end).enumerate() {
                sink.push_frame(FrameIndex(f), &frames[frame_to_unique[i]])?;
            }

            let n = chunk_end - chunk_start;
            stats.frames_total += n;
            stats.frames_rendered += frames.len() as u64;
            stats.frames_elided += n - frames.len() as u64;
            tracing::debug!(chunk_start, chunk_end, rendered = frames.len(), "chunk done");
            chunk_start = chunk_end;
        }

        sink.end()?;
        tracing::info!(
            total = stats.frames_total,
            rendered = stats.frames_rendered,
            elided = stats.frames_elided,
            "render_range finished"
        );
        Ok(stats)
    }

    /// Render the whole scene.
    pub fn render_all(&self, sink: &mut dyn FrameSink) -> ScenegridResult<RenderStats> {
        self.render_range(self.timeline.full_range(), sink)
    }
}

fn dedupe(lists: Vec<DisplayList>) -> (Vec<DisplayList>, Vec<usize>) {
    let mut seen = HashMap::<FrameFingerprint, usize>::new();
    let mut unique = Vec::new();
    let mut map = Vec::with_capacity(lists.len());
    for list in lists {
        let fp = fingerprint_display_list(&list);
        let idx = *seen.entry(fp).or_insert_with(|| {
            unique.push(list);
            unique.len() - 1
        });
        map.push(idx);
    }
    (unique, map)
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> ScenegridResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScenegridError::validation(
            "render_range 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScenegridError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
