use super::SurfaceErrorAction;

/// Format used when no surface is involved (offscreen views, headless devices).
pub(crate) const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// FIFO is the one present mode every surface must support.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Decides what the view does after failing to acquire a drawable.
///
/// `Lost`/`Outdated` surfaces are reconfigured by the caller and the frame is
/// skipped; running out of memory is the only unrecoverable case.
pub(crate) fn classify_surface_error(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(
        formats: &[wgpu::TextureFormat],
        alpha_modes: &[wgpu::CompositeAlphaMode],
    ) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: alpha_modes.to_vec(),
            ..Default::default()
        }
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_none_when_surface_reports_nothing() {
        assert_eq!(choose_surface_format(&caps(&[], &[]), true), None);
    }

    #[test]
    fn format_prefers_srgb_even_when_listed_later() {
        let c = caps(
            &[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            &[],
        );
        assert_eq!(
            choose_surface_format(&c, true),
            Some(wgpu::TextureFormat::Bgra8UnormSrgb)
        );
    }

    #[test]
    fn format_takes_first_when_srgb_not_wanted() {
        let c = caps(
            &[wgpu::TextureFormat::Bgra8Unorm, wgpu::TextureFormat::Bgra8UnormSrgb],
            &[],
        );
        assert_eq!(choose_surface_format(&c, false), Some(wgpu::TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn format_falls_back_to_first_without_srgb_support() {
        let c = caps(&[wgpu::TextureFormat::Rgba16Float], &[]);
        assert_eq!(choose_surface_format(&c, true), Some(wgpu::TextureFormat::Rgba16Float));
    }

    // ── alpha ─────────────────────────────────────────────────────────────

    #[test]
    fn alpha_keeps_supported_request() {
        let c = caps(
            &[],
            &[wgpu::CompositeAlphaMode::Opaque, wgpu::CompositeAlphaMode::PreMultiplied],
        );
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }

    #[test]
    fn alpha_replaces_unsupported_request_with_first_mode() {
        let c = caps(&[], &[wgpu::CompositeAlphaMode::Opaque]);
        assert_eq!(
            choose_alpha_mode(&c, Some(wgpu::CompositeAlphaMode::PostMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn alpha_auto_when_surface_reports_nothing() {
        assert_eq!(choose_alpha_mode(&caps(&[], &[]), None), wgpu::CompositeAlphaMode::Auto);
    }

    // ── present mode ──────────────────────────────────────────────────────

    #[test]
    fn present_mode_falls_back_to_fifo() {
        let c = wgpu::SurfaceCapabilities {
            present_modes: vec![wgpu::PresentMode::Fifo],
            ..Default::default()
        };
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Fifo
        );
    }

    #[test]
    fn present_mode_keeps_supported_request() {
        let c = wgpu::SurfaceCapabilities {
            present_modes: vec![wgpu::PresentMode::Fifo, wgpu::PresentMode::Mailbox],
            ..Default::default()
        };
        assert_eq!(
            choose_present_mode(&c, wgpu::PresentMode::Mailbox),
            wgpu::PresentMode::Mailbox
        );
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigured
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigured
        );
    }

    #[test]
    fn transient_errors_skip_the_frame() {
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            classify_surface_error(&wgpu::SurfaceError::Other),
            SurfaceErrorAction::SkipFrame
        );
    }

    #[test]
    fn out_of_memory_is_the_only_fatal_error() {
        assert!(classify_surface_error(&wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(!classify_surface_error(&wgpu::SurfaceError::Lost).is_fatal());
    }
}
