//! End-to-end pipeline: load, reduce, expand, save.

use std::{fs, path::PathBuf, time::Instant};

use luma_convert_core::{expand, reduce, GrayscaleImage, ReductionMethod, RgbImage, RgbImageView};

use crate::io::{commit_staged, load_rgb, stage_rgb};
use crate::{ConvertConfig, ConvertError, ConvertReport, OutputReport, OutputSpec, TimingsMs};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// An expanded grid waiting to be written.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub spec: OutputSpec,
    pub path: PathBuf,
    pub image: RgbImage,
}

/// Reduce and expand `src` for every requested output, in memory.
///
/// Each reduction method runs at most once even if several outputs use it.
/// Two outputs resolving to the same path are rejected.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg, src), fields(width = src.width(), height = src.height()))
)]
pub fn render(cfg: &ConvertConfig, src: &RgbImageView<'_>) -> Result<Vec<RenderedOutput>, ConvertError> {
    let mut reduced: Vec<(ReductionMethod, GrayscaleImage)> = Vec::new();
    let mut rendered = Vec::new();

    for spec in cfg.output_specs() {
        let path = cfg.output_path(&spec);
        if rendered.iter().any(|out: &RenderedOutput| out.path == path) {
            return Err(ConvertError::DuplicateOutput { path });
        }
        let gray = match reduced.iter().position(|(m, _)| *m == spec.method) {
            Some(i) => &reduced[i].1,
            None => {
                reduced.push((spec.method, reduce(src, spec.method)?));
                &reduced[reduced.len() - 1].1
            }
        };
        let image = expand(gray, &spec.expand_params());
        rendered.push(RenderedOutput { spec, path, image });
    }
    Ok(rendered)
}

/// Write every rendered output, or none of them.
///
/// All files are first encoded into temporaries beside their destinations.
/// They are moved into place only once every encode succeeded; if a move
/// fails, the outputs already moved are removed again.
pub fn write_all(rendered: &[RenderedOutput]) -> Result<(), ConvertError> {
    let staged = rendered
        .iter()
        .map(|out| stage_rgb(&out.image, &out.path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut placed: Vec<&PathBuf> = Vec::with_capacity(rendered.len());
    for (file, out) in staged.into_iter().zip(rendered) {
        if let Err(err) = commit_staged(file, &out.path) {
            for path in placed {
                if let Err(rm) = fs::remove_file(path) {
                    log::warn!("could not roll back {}: {rm}", path.display());
                }
            }
            return Err(err);
        }
        placed.push(&out.path);
    }

    for out in rendered {
        log::info!("wrote {} output to {}", out.spec.method, out.path.display());
    }
    Ok(())
}

/// Run the whole conversion described by `cfg`.
///
/// A failure at any stage leaves no output file behind.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(cfg), fields(input = %cfg.input_path)))]
pub fn run(cfg: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    let t_total = Instant::now();

    let (src, load_image) = timed_result(|| load_rgb(&cfg.input_path))?;
    log::info!(
        "loaded {}x{} image from {}",
        src.width(),
        src.height(),
        cfg.input_path
    );

    let (rendered, convert) = timed_result(|| render(cfg, &src.view()))?;
    let ((), save) = timed_result(|| write_all(&rendered))?;

    let outputs = rendered
        .into_iter()
        .map(|out| OutputReport {
            method: out.spec.method,
            mode: out.spec.mode,
            pack: out.spec.pack,
            path: out.path.to_string_lossy().into_owned(),
        })
        .collect();

    Ok(ConvertReport {
        input_path: cfg.input_path.clone(),
        width: src.width(),
        height: src.height(),
        outputs,
        timings_ms: TimingsMs {
            load_image,
            convert,
            save,
            total: t_total.elapsed().as_millis() as u64,
        },
    })
}

fn timed_result<T, E, F: FnOnce() -> Result<T, E>>(f: F) -> Result<(T, u64), E> {
    let start = Instant::now();
    let value = f()?;
    let elapsed = start.elapsed().as_millis() as u64;
    Ok((value, elapsed))
}
