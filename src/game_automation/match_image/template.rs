//! Template loading and lookup

use crate::error::{ReelError, ReelResult};
use crate::template_matching::Template;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Well-known template names (file stems inside the template directory)
pub mod names {
    pub const FISH_LEFT: &str = "fish_left";
    pub const FISH_RIGHT: &str = "fish_right";
    pub const ROD_ENGAGED: &str = "rod_engaged";
    pub const ROD_DISENGAGED: &str = "rod_disengaged";
    pub const BITE_ALERT: &str = "bite_alert";
    pub const INDICATOR: &str = "indicator";
}

/// Templates without which the detector set cannot start
pub const REQUIRED_TEMPLATES: [&str; 5] = [
    names::FISH_LEFT,
    names::FISH_RIGHT,
    names::ROD_ENGAGED,
    names::ROD_DISENGAGED,
    names::BITE_ALERT,
];

/// Templates that only sharpen detection when present
pub const OPTIONAL_TEMPLATES: [&str; 1] = [names::INDICATOR];

/// Larger templates are shrunk at load time to fit inside this box
pub const MAX_TEMPLATE_SIZE: (u32, u32) = (300, 200);

/// Immutable set of loaded templates, shared read-only by every detector.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Arc<Template>>,
}

impl TemplateStore {
    /// Load every required template from `directory`, plus any optional ones.
    ///
    /// A missing or unreadable required template is fatal.
    pub fn load_from_directory(directory: impl AsRef<Path>) -> ReelResult<Self> {
        let dir = directory.as_ref();
        if !dir.is_dir() {
            return Err(ReelError::TemplateDirMissing {
                path: dir.to_path_buf(),
            });
        }

        let mut store = Self::default();
        for name in REQUIRED_TEMPLATES {
            let template = load_template(dir, name)?;
            store.insert(template);
        }
        for name in OPTIONAL_TEMPLATES {
            if !dir.join(format!("{name}.png")).is_file() {
                log::debug!("Optional template '{}' not present", name);
                continue;
            }
            match load_template(dir, name) {
                Ok(template) => store.insert(template),
                Err(e) => log::warn!("Ignoring optional template: {}", e),
            }
        }

        log::info!(
            "Loaded {} templates from {:?}: {}",
            store.count(),
            dir,
            store.names().join(", ")
        );
        Ok(store)
    }

    /// Build a store from already decoded templates
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        let mut store = Self::default();
        for template in templates {
            store.insert(template);
        }
        store
    }

    fn insert(&mut self, template: Template) {
        self.templates
            .insert(template.name.clone(), Arc::new(template));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.templates.get(name).cloned()
    }

    /// Template that must exist once the store is built
    pub fn require(&self, name: &str) -> ReelResult<Arc<Template>> {
        self.get(name).ok_or_else(|| ReelError::InvalidConfig {
            reason: format!("template '{name}' is not loaded"),
        })
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }
}

fn load_template(dir: &Path, name: &str) -> ReelResult<Template> {
    let path = dir.join(format!("{name}.png"));
    let image = image::open(&path).map_err(|source| ReelError::TemplateMissing {
        name: name.to_string(),
        path: path.clone(),
        source,
    })?;
    let rgb = image.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(ReelError::TemplateEmpty {
            name: name.to_string(),
            width: rgb.width(),
            height: rgb.height(),
        });
    }

    let fitted = fit_within(rgb, MAX_TEMPLATE_SIZE);
    log::debug!(
        "Template '{}' loaded from {:?} ({}x{})",
        name,
        path,
        fitted.width(),
        fitted.height()
    );
    Ok(Template::from_rgb(name, fitted))
}

/// Shrink `image` preserving aspect ratio until it fits `max`; never enlarges.
pub fn fit_within(image: RgbImage, max: (u32, u32)) -> RgbImage {
    let (w, h) = image.dimensions();
    if w <= max.0 && h <= max.1 {
        return image;
    }
    let factor = (max.0 as f64 / w as f64).min(max.1 as f64 / h as f64);
    let new_w = ((w as f64 * factor).round() as u32).clamp(1, max.0);
    let new_h = ((h as f64 * factor).round() as u32).clamp(1, max.1);
    log::info!("Downscaling template {}x{} -> {}x{}", w, h, new_w, new_h);
    imageops::resize(&image, new_w, new_h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_keeps_small_images() {
        let img = RgbImage::new(40, 30);
        assert_eq!(fit_within(img, MAX_TEMPLATE_SIZE).dimensions(), (40, 30));
    }

    #[test]
    fn test_fit_within_preserves_aspect() {
        let img = RgbImage::new(600, 200);
        assert_eq!(fit_within(img, MAX_TEMPLATE_SIZE).dimensions(), (300, 100));
        let tall = RgbImage::new(100, 400);
        assert_eq!(fit_within(tall, MAX_TEMPLATE_SIZE).dimensions(), (50, 200));
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let err = TemplateStore::load_from_directory("/definitely/not/here").unwrap_err();
        assert!(matches!(err, ReelError::TemplateDirMissing { .. }));
    }

    #[test]
    fn test_missing_required_template_is_fatal() {
        let dir = std::env::temp_dir().join(format!("reel-assist-tpl-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        RgbImage::from_pixel(8, 8, image::Rgb([200, 10, 10]))
            .save(dir.join("fish_left.png"))
            .unwrap();

        let err = TemplateStore::load_from_directory(&dir).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        match err {
            ReelError::TemplateMissing { name, .. } => assert_eq!(name, names::FISH_RIGHT),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_templates_lookup() {
        let store = TemplateStore::from_templates([Template::from_rgb(
            names::BITE_ALERT,
            RgbImage::new(5, 5),
        )]);
        assert_eq!(store.count(), 1);
        assert!(store.get(names::BITE_ALERT).is_some());
        assert!(store.require(names::FISH_LEFT).is_err());
    }
}
