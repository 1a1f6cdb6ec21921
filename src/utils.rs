use std::path::{Path, PathBuf};

use yuv::{YuvBiPlanarImage, YuvConversionMode, YuvPlanarImage, YuvRange, YuvStandardMatrix};

/// Frame conversion and capture file helpers for the desktop camera
use crate::error::{Error, Result};

fn matrix_for(width: u32, height: u32) -> YuvStandardMatrix {
    if width >= 1280 || height >= 720 {
        YuvStandardMatrix::Bt709
    } else {
        YuvStandardMatrix::Bt601
    }
}

fn check_420_size(data: &[u8], width: u32, height: u32, label: &str) -> Result<()> {
    let expected = width as usize * height as usize * 3 / 2;
    if data.len() < expected {
        return Err(Error::CaptureFailed(format!(
            "Invalid {} buffer size: expected at least {}, got {}",
            label,
            expected,
            data.len()
        )));
    }
    Ok(())
}

/// Convert an I420 buffer (Y plane, U plane, V plane) to packed RGB24
pub fn yuv_to_rgb(yuv_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    check_420_size(yuv_data, width, height, "YUV")?;

    let y_size = width as usize * height as usize;
    let chroma_size = y_size / 4;
    let v_offset = y_size + chroma_size;
    let image = YuvPlanarImage {
        y_plane: &yuv_data[..y_size],
        y_stride: width,
        u_plane: &yuv_data[y_size..v_offset],
        u_stride: width / 2,
        v_plane: &yuv_data[v_offset..v_offset + chroma_size],
        v_stride: width / 2,
        width,
        height,
    };

    let mut rgb = vec![0u8; y_size * 3];
    yuv::yuv420_to_rgb(
        &image,
        &mut rgb,
        width * 3,
        YuvRange::Limited,
        matrix_for(width, height),
    )
    .map_err(|e| Error::CaptureFailed(format!("YUV to RGB conversion failed: {:?}", e)))?;
    Ok(rgb)
}

/// Convert an NV12 buffer (Y plane, interleaved UV plane) to packed RGB24
pub fn nv12_to_rgb(yuv_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    check_420_size(yuv_data, width, height, "NV12")?;

    let y_size = width as usize * height as usize;
    let image = YuvBiPlanarImage {
        y_plane: &yuv_data[..y_size],
        y_stride: width,
        uv_plane: &yuv_data[y_size..],
        uv_stride: width,
        width,
        height,
    };

    let mut rgb = vec![0u8; y_size * 3];
    yuv::yuv_nv12_to_rgb(
        &image,
        &mut rgb,
        width * 3,
        YuvRange::Limited,
        matrix_for(width, height),
        YuvConversionMode::Fast,
    )
    .map_err(|e| Error::CaptureFailed(format!("NV12 to RGB conversion failed: {:?}", e)))?;
    Ok(rgb)
}

/// Normalizes a camera frame to RGB24 whatever format the backend delivered.
pub fn frame_to_rgb(format: &str, data: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    match format {
        "RGB8" => Ok(data),
        "YUV" => yuv_to_rgb(&data, width, height),
        "NV12" => nv12_to_rgb(&data, width, height),
        other => Err(Error::CaptureFailed(format!(
            "Unsupported frame format: {}",
            other
        ))),
    }
}

/// Writes an RGB24 image as `capture-<uuid>.png` under `dir`.
pub fn write_png(dir: &Path, rgb: &[u8], width: u32, height: u32) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("capture-{}.png", uuid::Uuid::new_v4()));
    image::save_buffer(&path, rgb, width, height, image::ColorType::Rgb8)?;
    Ok(path)
}
