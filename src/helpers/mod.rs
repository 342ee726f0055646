pub mod handler_404;
pub mod html;
pub mod quality_filter;
