mod vitals_test;
