//! Export of the rendered invoice through a rasterization collaborator.

mod text;

use std::{fmt, path::PathBuf, thread, time::Duration};

use chrono::NaiveDate;
use tracing::{error, info};

use crate::{
    errors::{InvoiceError, Result},
    invoice::InvoiceDraft,
    preview::{build_document, InvoiceDocument},
    wizard::Notification,
};

pub use text::PlainTextRasterizer;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => f.write_str("a4"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("portrait"),
            Orientation::Landscape => f.write_str("landscape"),
        }
    }
}

/// Format options handed to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub page: PageSize,
    pub orientation: Orientation,
    /// Top, right, bottom, left.
    pub margins_mm: [f32; 4],
    pub image_quality: f32,
    pub scale: f32,
    /// Pause before rasterizing so the rendered view can settle.
    pub settle_delay: Duration,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            orientation: Orientation::Portrait,
            margins_mm: [10.0; 4],
            image_quality: 0.98,
            scale: 2.0,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Converts a rendered document into a file.
pub trait Rasterizer: Send {
    fn rasterize(
        &mut self,
        document: &InvoiceDocument,
        options: &ExportOptions,
        file_stem: &str,
    ) -> Result<PathBuf>;
}

/// `Invoice_<brand>_<YYYY-MM-DD>`, with `Brand` standing in for a missing
/// brand name.
pub fn export_file_stem(draft: &InvoiceDraft, today: NaiveDate) -> String {
    let brand = draft.campaign.brand_name.trim();
    let brand = if brand.is_empty() {
        "Brand".to_string()
    } else {
        brand.replace(['/', '\\'], "_")
    };
    format!("Invoice_{}_{}", brand, today.format("%Y-%m-%d"))
}

/// Runs one export at a time; `&mut self` keeps a second export from
/// starting while one is in flight.
pub struct ExportPipeline {
    rasterizer: Box<dyn Rasterizer>,
    options: ExportOptions,
    notifications: Vec<Notification>,
}

impl ExportPipeline {
    pub fn new(rasterizer: Box<dyn Rasterizer>, options: ExportOptions) -> Self {
        Self {
            rasterizer,
            options,
            notifications: Vec::new(),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Exports the draft's preview. The draft is only read.
    ///
    /// The account holder must equal the influencer's full name byte for
    /// byte; otherwise the export stops before anything is rendered.
    pub fn export(&mut self, draft: &InvoiceDraft, today: NaiveDate) -> Result<PathBuf> {
        if !draft.bank.holder_matches(draft.payee_name()) {
            self.notifications.push(Notification::error(
                "Name Mismatch",
                "Account holder name must match the influencer's full name.",
            ));
            return Err(InvoiceError::PayeeMismatch {
                holder: draft.bank.account_holder_name.clone(),
                payee: draft.payee_name().to_string(),
            });
        }

        self.notifications.push(Notification::info(
            "Generating PDF",
            "Please wait while we prepare your invoice PDF...",
        ));
        if !self.options.settle_delay.is_zero() {
            thread::sleep(self.options.settle_delay);
        }

        let document = build_document(draft, today);
        let stem = export_file_stem(draft, today);
        match self.rasterizer.rasterize(&document, &self.options, &stem) {
            Ok(path) => {
                info!(path = %path.display(), "invoice exported");
                self.notifications.push(Notification::success(
                    "PDF Downloaded",
                    "Your invoice has been downloaded successfully.",
                ));
                Ok(path)
            }
            Err(err) => {
                error!(error = %err, "invoice export failed");
                self.notifications.push(Notification::error(
                    "PDF Generation Failed",
                    "There was an error generating your PDF. Please try again.",
                ));
                Err(InvoiceError::Export(err.to_string()))
            }
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{BankDetails, InfluencerProfile};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeRasterizer {
        calls: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Rasterizer for FakeRasterizer {
        fn rasterize(
            &mut self,
            _document: &InvoiceDocument,
            _options: &ExportOptions,
            file_stem: &str,
        ) -> Result<PathBuf> {
            self.calls.lock().unwrap().push(file_stem.to_string());
            if self.fail {
                Err(InvoiceError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
            } else {
                Ok(PathBuf::from(format!("{file_stem}.pdf")))
            }
        }
    }

    fn pipeline(rasterizer: &FakeRasterizer) -> ExportPipeline {
        let options = ExportOptions {
            settle_delay: Duration::ZERO,
            ..ExportOptions::default()
        };
        ExportPipeline::new(Box::new(rasterizer.clone()), options)
    }

    fn draft(payee: &str, holder: &str) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        draft.influencer = InfluencerProfile::new(payee, "12 MG Road", "9876543210");
        draft.bank = BankDetails {
            account_holder_name: holder.into(),
            ..BankDetails::default()
        };
        draft.campaign.brand_name = "Glow Co".into();
        draft
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
    }

    #[test]
    fn default_options_match_print_layout() {
        let options = ExportOptions::default();
        assert_eq!(options.page, PageSize::A4);
        assert_eq!(options.orientation, Orientation::Portrait);
        assert_eq!(options.margins_mm, [10.0; 4]);
        assert_eq!(options.image_quality, 0.98);
        assert_eq!(options.scale, 2.0);
    }

    #[test]
    fn matching_payee_exports() {
        let rasterizer = FakeRasterizer::default();
        let mut pipeline = pipeline(&rasterizer);
        let path = pipeline.export(&draft("Asha Rao", "Asha Rao"), today()).unwrap();
        assert_eq!(path, PathBuf::from("Invoice_Glow Co_2025-04-02.pdf"));
        let titles: Vec<_> = pipeline
            .drain_notifications()
            .into_iter()
            .map(|notice| notice.title)
            .collect();
        assert_eq!(titles, vec!["Generating PDF", "PDF Downloaded"]);
    }

    #[test]
    fn mismatched_payee_is_refused_before_rendering() {
        for holder in ["asha rao", "Asha Rao ", " Asha Rao", "Asha\tRao", "", "Someone"] {
            let rasterizer = FakeRasterizer::default();
            let mut pipeline = pipeline(&rasterizer);
            let source = draft("Asha Rao", holder);
            let before = source.clone();
            let err = pipeline.export(&source, today()).unwrap_err();
            assert!(matches!(err, InvoiceError::PayeeMismatch { .. }));
            assert!(rasterizer.calls.lock().unwrap().is_empty());
            assert_eq!(source, before);
        }
    }

    #[test]
    fn rasterizer_failure_is_reported() {
        let rasterizer = FakeRasterizer {
            fail: true,
            ..FakeRasterizer::default()
        };
        let mut pipeline = pipeline(&rasterizer);
        let err = pipeline
            .export(&draft("Asha Rao", "Asha Rao"), today())
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Export(_)));
        let notices = pipeline.drain_notifications();
        assert_eq!(notices.last().unwrap().title, "PDF Generation Failed");
    }

    #[test]
    fn missing_brand_uses_placeholder_stem() {
        let mut source = draft("Asha Rao", "Asha Rao");
        source.campaign.brand_name.clear();
        assert_eq!(export_file_stem(&source, today()), "Invoice_Brand_2025-04-02");
    }
}
