fn finished() {
}

fn unfinished() {
    let x = 1;
