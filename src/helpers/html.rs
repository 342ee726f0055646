use tera::{Context, Tera};
use crate::models::restaurant::RestaurantRecord;

pub const NO_RESULTS_MESSAGE: &str = "No highly-rated restaurants found in this location.";

/// Renders the HTML pages from templates embedded at compile time. Template
/// names end in `.html`, so tera escapes every interpolated value.
pub struct PageRenderer {
    engine: Tera,
}

impl PageRenderer {
    pub fn new() -> tera::Result<Self> {
        let mut engine = Tera::default();
        engine.add_raw_templates(vec![
            ("search_form.html", include_str!("../../templates/search_form.html")),
            ("results.html", include_str!("../../templates/results.html")),
            ("no_results.html", include_str!("../../templates/no_results.html")),
        ])?;

        Ok(Self { engine })
    }

    pub fn search_form_page(&self) -> tera::Result<String> {
        self.engine.render("search_form.html", &Context::new())
    }

    pub fn no_results_page(&self) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("message", NO_RESULTS_MESSAGE);
        self.engine.render("no_results.html", &context)
    }

    /// Lists the filtered restaurants, echoing the searched location.
    pub fn results_page(
        &self,
        location: &str,
        restaurants: &[RestaurantRecord],
    ) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("location", location);
        context.insert("restaurants", restaurants);
        self.engine.render("results.html", &context)
    }
}
