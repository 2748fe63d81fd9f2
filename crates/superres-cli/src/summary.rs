use console::Style;
use superres_core::pipeline::config::PipelineConfig;
use superres_core::pipeline::default_upscale_factor;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Super Resolution"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    // Inputs / Output
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(config.inputs.len())
    );
    if let Some(reference) = config.inputs.first() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Reference"),
            s.path.apply_to(reference.display())
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    let scale = match config.upscale_factor {
        Some(f) => format!("{}x", f),
        None => format!("{}x (auto)", default_upscale_factor(config.inputs.len())),
    };
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(scale)
    );
    println!();

    // Alignment
    let rc = &config.reconstruction;
    println!("  {}", s.header.apply_to("Alignment"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(format!("{} px", rc.alignment.search_radius))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Score"),
        s.method.apply_to(rc.alignment.normalization)
    );
    println!();

    // Fusion
    println!("  {}", s.header.apply_to("Fusion"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Strategy"),
        s.method.apply_to(rc.fusion)
    );
    let threads = match rc.threads {
        Some(n) => n.to_string(),
        None => "auto".to_string(),
    };
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(threads)
    );
    println!();
}
