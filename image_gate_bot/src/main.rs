use bot_commons::*;

fn main() {
    start_everything(
        "warn,image_gate_bot=info,bot_commons=info",
        image_gate_bot::entry(),
    );
}
