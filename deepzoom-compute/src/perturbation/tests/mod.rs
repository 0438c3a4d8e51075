mod helpers;

mod pixel;
