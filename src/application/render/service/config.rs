use comrak::options::Options;

/// Parser options for markup content. Only extensions whose nodes have an IR
/// counterpart are switched on; anything else would surface as an unsupported
/// node and fail the render.
pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_extensions(&mut options);
    options
}

fn configure_extensions(options: &mut Options<'static>) {
    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.underline = true;
    ext.autolink = true;
    ext.tagfilter = false;

    options.parse.smart = false;
}
